//! HTML page templates.
//!
//! Every interpolated value passes through [`escape_html`]; note paths used
//! in URLs are percent-encoded first.

use crate::i18n::{Lang, Msg};
use axum::response::Html;
use webnote_core::models::{Note, NoteEntry};
use webnote_core::AppError;

const STYLE: &str = "\
body{margin:0;font-family:system-ui,sans-serif;background:#f6f6f2;color:#222}\
main{max-width:960px;margin:0 auto;padding:16px}\
textarea{width:100%;min-height:70vh;box-sizing:border-box;padding:12px;font:15px/1.5 ui-monospace,monospace;border:1px solid #ccc;border-radius:6px}\
.bar{display:flex;gap:12px;align-items:center;flex-wrap:wrap;margin:8px 0}\
.muted{color:#777;font-size:13px}\
.content{white-space:pre-wrap;word-break:break-word;background:#fff;padding:12px;border-radius:6px}\
table{width:100%;border-collapse:collapse}td,th{padding:6px;border-bottom:1px solid #ddd;text-align:left}\
a{color:#0b6bcb}";

/// Escape text for HTML element content and quoted attributes.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn note_href(path: &str) -> String {
    format!("/{}", urlencoding::encode(path))
}

fn layout(lang: Lang, title: &str, body_attrs: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"{lang}\">\n<head>\n<meta charset=\"utf-8\">\n\
<meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">\n\
<title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body{body_attrs}>\n<main>\n{body}\n</main>\n</body>\n</html>\n",
        lang = lang.html_tag(),
        title = escape_html(title),
    ))
}

const EDIT_SCRIPT: &str = r#"<script>
(function () {
  var base = location.pathname || document.body.dataset.href;
  var text = document.getElementById('t');
  var status = document.getElementById('status');
  var timer = null;
  function post(url, body, json) {
    return fetch(url, {
      method: 'POST',
      headers: { 'Content-Type': json ? 'application/json' : 'application/x-www-form-urlencoded' },
      body: json ? JSON.stringify(body) : new URLSearchParams(body).toString()
    }).then(function (r) { return r.json(); });
  }
  text.addEventListener('input', function () {
    clearTimeout(timer);
    timer = setTimeout(function () {
      post(base, { t: text.value }, false).then(function (res) {
        status.textContent = res.code === 0 ? status.dataset.ok : status.dataset.fail;
      });
    }, 800);
  });
  document.getElementById('pw-form').addEventListener('submit', function (e) {
    e.preventDefault();
    post(base + '/pw', { passwd: document.getElementById('pw').value }, true).then(function () {
      location.reload();
    });
  });
  document.getElementById('share').addEventListener('change', function (e) {
    post(base + '/setting', { share: e.target.checked }, true).then(function (res) {
      var link = document.getElementById('share-link');
      link.textContent = res.data ? location.origin + '/share/' + res.data : '';
      link.href = res.data ? '/share/' + res.data : '#';
    });
  });
  document.getElementById('md').addEventListener('change', function (e) {
    post(base + '/setting', { mode: e.target.checked ? 'md' : '' }, true);
  });
})();
</script>"#;

/// Editable view of a note (`edit` template).
pub fn edit_page(lang: Lang, note: &Note, share_token: Option<&str>) -> Html<String> {
    let href = note_href(&note.path);
    let share_link = share_token
        .map(|token| {
            let url = format!("/share/{}", token);
            format!(
                "<a id=\"share-link\" href=\"{0}\">{0}</a>",
                escape_html(&url)
            )
        })
        .unwrap_or_else(|| "<a id=\"share-link\" href=\"#\"></a>".to_string());
    let checked = |on: bool| if on { " checked" } else { "" };
    let body = format!(
        "<div class=\"bar\"><strong>{title}</strong><a href=\"/directory\">{directory}</a>\
<a href=\"/new\">{new}</a><span id=\"status\" class=\"muted\" data-ok=\"{saved}\" data-fail=\"{failed}\"></span></div>\n\
<textarea id=\"t\" placeholder=\"{placeholder}\" autofocus>{content}</textarea>\n\
<div class=\"bar\">\
<form id=\"pw-form\"><input id=\"pw\" type=\"password\" placeholder=\"{set_pw}\"> <button>{password}</button></form>\
<label><input id=\"share\" type=\"checkbox\"{shared}> {share}</label> {share_link}\
<label><input id=\"md\" type=\"checkbox\"{md}> {markdown}</label></div>\n{script}",
        title = escape_html(&note.path),
        directory = lang.text(Msg::Directory),
        new = lang.text(Msg::NewNote),
        saved = lang.text(Msg::Saved),
        failed = lang.text(Msg::SaveFailed),
        placeholder = lang.text(Msg::Placeholder),
        content = escape_html(&note.content),
        set_pw = lang.text(Msg::SetPassword),
        password = lang.text(Msg::Password),
        shared = checked(note.meta.share),
        share = lang.text(Msg::Share),
        md = checked(note.meta.mode.as_deref() == Some("md")),
        markdown = lang.text(Msg::Markdown),
        script = EDIT_SCRIPT,
    );
    let attrs = format!(" data-href=\"{}\"", escape_html(&href));
    layout(lang, &note.path, &attrs, &body)
}

/// Password prompt for a protected note (`need_passwd` template).
pub fn need_password_page(lang: Lang, path: &str) -> Html<String> {
    let href = note_href(path);
    let body = format!(
        "<h2>{title}</h2>\n<p>{prompt}</p>\n\
<form id=\"auth-form\"><input id=\"pw\" type=\"password\" placeholder=\"{password}\" autofocus> \
<button>{unlock}</button> <span id=\"status\" class=\"muted\"></span></form>\n\
<script>\n\
document.getElementById('auth-form').addEventListener('submit', function (e) {{\n\
  e.preventDefault();\n\
  fetch((location.pathname || document.body.dataset.href) + '/auth', {{\n\
    method: 'POST', headers: {{ 'Content-Type': 'application/json' }},\n\
    body: JSON.stringify({{ passwd: document.getElementById('pw').value }})\n\
  }}).then(function (r) {{ return r.json(); }}).then(function (res) {{\n\
    if (res.refresh) {{ location.reload(); }} else {{ document.getElementById('status').textContent = res.message; }}\n\
  }});\n\
}});\n\
</script>",
        title = escape_html(path),
        prompt = lang.text(Msg::PasswordPrompt),
        password = lang.text(Msg::Password),
        unlock = lang.text(Msg::Unlock),
    );
    let attrs = format!(" data-href=\"{}\"", escape_html(&href));
    layout(lang, path, &attrs, &body)
}

/// Read-only public view (`share` template).
pub fn share_page(lang: Lang, note: &Note) -> Html<String> {
    let mode = note.meta.mode.as_deref().unwrap_or("plain");
    let body = format!(
        "<div class=\"bar\"><strong>{title}</strong><span class=\"muted\">{shared}</span></div>\n\
<div class=\"content\" data-mode=\"{mode}\">{content}</div>",
        title = escape_html(&note.path),
        shared = lang.text(Msg::Shared),
        mode = escape_html(mode),
        content = escape_html(&note.content),
    );
    layout(lang, &note.path, "", &body)
}

/// Directory of all notes (`directory` template).
///
/// The listing is also embedded as JSON for client-side filtering.
///
/// # Errors
/// Returns an error if the listing cannot be serialized.
pub fn directory_page(lang: Lang, entries: &[NoteEntry]) -> Result<Html<String>, AppError> {
    let embedded = serde_json::to_string(entries)?.replace("</", "<\\/");
    let rows: String = entries
        .iter()
        .map(|entry| {
            let mut flags = Vec::new();
            if entry.has_password {
                flags.push(lang.text(Msg::Protected));
            }
            if entry.is_shared {
                flags.push(lang.text(Msg::Shared));
            }
            format!(
                "<tr><td><a href=\"{href}\">{title}</a></td><td>{updated}</td><td class=\"muted\">{flags}</td></tr>\n",
                href = escape_html(&note_href(&entry.key)),
                title = escape_html(&entry.title),
                updated = escape_html(&entry.update_at.display()),
                flags = flags.join(" · "),
            )
        })
        .collect();
    let table = if entries.is_empty() {
        format!("<p class=\"muted\">{}</p>", lang.text(Msg::NoNotes))
    } else {
        format!(
            "<table><thead><tr><th></th><th>{}</th><th></th></tr></thead><tbody>\n{}</tbody></table>",
            lang.text(Msg::LastUpdated),
            rows
        )
    };
    let body = format!(
        "<div class=\"bar\"><h2>{heading}</h2><a href=\"/new\">{new}</a><span class=\"muted\">{count}</span></div>\n\
{table}\n<script id=\"notes-data\" type=\"application/json\">{embedded}</script>",
        heading = lang.text(Msg::Directory),
        new = lang.text(Msg::NewNote),
        count = entries.len(),
    );
    Ok(layout(lang, lang.text(Msg::Directory), "", &body))
}

/// `404` template.
pub fn not_found_page(lang: Lang) -> Html<String> {
    let body = format!(
        "<h2>404</h2>\n<p>{}</p>\n<a href=\"/\">{}</a>",
        lang.text(Msg::NotFound),
        lang.text(Msg::BackHome)
    );
    layout(lang, "404", "", &body)
}

/// Generic `error` template.
pub fn error_page(lang: Lang) -> Html<String> {
    let body = format!(
        "<p>{}</p>\n<a href=\"/\">{}</a>",
        lang.text(Msg::ErrorOccurred),
        lang.text(Msg::BackHome)
    );
    layout(lang, "Error", "", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use webnote_core::models::NoteMeta;

    fn note(path: &str, content: &str) -> Note {
        Note {
            path: path.to_string(),
            content: content.to_string(),
            meta: NoteMeta::default(),
        }
    }

    #[test]
    fn escape_html_covers_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn edit_page_escapes_content_and_encodes_path() {
        let Html(html) = edit_page(Lang::En, &note("a b", "</textarea><script>"), None);
        assert!(html.contains("&lt;/textarea&gt;&lt;script&gt;"));
        assert!(html.contains("data-href=\"/a%20b\""));
        assert!(!html.contains("</textarea><script>"));
    }

    #[test]
    fn share_page_is_read_only() {
        let Html(html) = share_page(Lang::Zh, &note("n", "body"));
        assert!(html.contains("<html lang=\"zh-CN\">"));
        assert!(html.contains(">body</div>"));
        assert!(!html.contains("<textarea"));
    }

    #[test]
    fn directory_embeds_escaped_json() {
        let entries = vec![NoteEntry::new("</script>", &NoteMeta::default())];
        let Html(html) = directory_page(Lang::En, &entries).expect("render");
        assert!(html.contains("<\\/script>"));
        assert_eq!(html.matches("</script>").count(), 1);
    }

    #[test]
    fn empty_directory_shows_placeholder_text() {
        let Html(html) = directory_page(Lang::En, &[]).expect("render");
        assert!(html.contains("No notes yet."));
    }
}
