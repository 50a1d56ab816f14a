//! Builder page served at `/`

use maud::{html, Markup, PreEscaped, DOCTYPE};

const SCRIPT: &str = r#"
const selected = [];
let cover = null;

function renderOrder() {
  const list = document.getElementById('order');
  list.innerHTML = '';
  selected.forEach((name, i) => {
    const li = document.createElement('li');
    li.textContent = name + ' ';
    const up = document.createElement('button');
    up.textContent = '↑';
    up.onclick = () => { if (i > 0) { [selected[i - 1], selected[i]] = [selected[i], selected[i - 1]]; renderOrder(); } };
    const remove = document.createElement('button');
    remove.textContent = '✕';
    remove.onclick = () => { selected.splice(i, 1); renderOrder(); };
    li.append(up, remove);
    list.appendChild(li);
  });
}

function renderModules(names) {
  const container = document.getElementById('module-list');
  container.innerHTML = '';
  if (names.length === 0) {
    const empty = document.createElement('p');
    empty.className = 'empty';
    empty.textContent = 'No modules uploaded yet.';
    container.appendChild(empty);
    return;
  }
  const list = document.createElement('ul');
  list.id = 'modules';
  names.forEach((name) => {
    const li = document.createElement('li');
    const link = document.createElement('a');
    link.href = '/download/modules/' + encodeURIComponent(name);
    link.textContent = name;
    const add = document.createElement('button');
    add.type = 'button';
    add.textContent = 'Add';
    add.onclick = () => addModule(name);
    li.append(link, ' ', add);
    list.appendChild(li);
  });
  container.appendChild(list);
}

async function uploadModules(event) {
  event.preventDefault();
  const res = await fetch('/upload', { method: 'POST', body: new FormData(event.target) });
  const data = await res.json();
  if (!res.ok) {
    document.getElementById('upload-status').textContent = data.error;
    return;
  }
  document.getElementById('upload-status').textContent =
    data.saved.length ? 'Saved: ' + data.saved.join(', ') : 'No PDF files saved.';
  event.target.reset();
  renderModules(data.all);
}

function addModule(name) {
  selected.push(name);
  renderOrder();
}

async function generateCover(event) {
  event.preventDefault();
  const form = new FormData(event.target);
  const res = await fetch('/generate_cover', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify(Object.fromEntries(form)),
  });
  const data = await res.json();
  cover = data.cover;
  document.getElementById('cover-status').innerHTML =
    'Cover: <a href="/download/covers/' + cover + '">' + cover + '</a>';
}

async function exportProposal() {
  const res = await fetch('/export', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({ files: selected, cover: cover }),
  });
  const data = await res.json();
  window.location = '/download/exports/' + data.export;
}
"#;

/// Render the builder page.
pub fn render_index(modules: &[String], brand_primary: &str, today: &str, show_logo: bool) -> Markup {
    let css = format!(
        "body {{ font-family: Helvetica, Arial, sans-serif; margin: 2rem; }}\n\
         h1, h2 {{ color: {brand_primary}; }}\n\
         button {{ background: {brand_primary}; color: #fff; border: 0; padding: .4rem .8rem; margin: .1rem; }}\n\
         section {{ margin-bottom: 2rem; }}"
    );

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "Proposal Builder" }
                style { (css) }
            }
            body {
                header {
                    @if show_logo {
                        img src="/static/logo.png" alt="Logo" height="48";
                    }
                    h1 { "Proposal Builder" }
                }
                section {
                    h2 { "Upload modules" }
                    form action="/upload" method="post" enctype="multipart/form-data" onsubmit="uploadModules(event)" {
                        input type="file" name="files" accept=".pdf,application/pdf" multiple;
                        button type="submit" { "Upload" }
                    }
                    p #upload-status {}
                }
                section {
                    h2 { "Modules" }
                    div #module-list {
                        @if modules.is_empty() {
                            p.empty { "No modules uploaded yet." }
                        } @else {
                            ul #modules {
                                @for name in modules {
                                    li {
                                        a href={ "/download/modules/" (name) } { (name) }
                                        " "
                                        button type="button" data-name=(name) onclick="addModule(this.dataset.name)" { "Add" }
                                    }
                                }
                            }
                        }
                    }
                    h2 { "Order" }
                    ol #order {}
                }
                section {
                    h2 { "Cover" }
                    form onsubmit="generateCover(event)" {
                        p { label { "Title " input name="title" value="Proposal"; } }
                        p { label { "Client " input name="client_name"; } }
                        p { label { "Prepared by " input name="created_by"; } }
                        p { label { "Date " input type="date" name="date" value=(today); } }
                        button type="submit" { "Generate cover" }
                    }
                    p #cover-status {}
                }
                section {
                    button type="button" onclick="exportProposal()" { "Export proposal" }
                }
                script { (PreEscaped(SCRIPT)) }
            }
        }
    }
}
