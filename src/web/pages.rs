//! Server-rendered HTML pages for the notes UI.
//!
//! The pages are small enough to be format!-built strings. Everything user
//! controlled goes through [`escape`] (text and attribute positions) or
//! percent-encoding (link query strings).

use crate::notes::Note;

/// Minimal HTML escaping for text and double-quoted attribute values
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Query string addressing one note, carrying the user id when present
fn item_query(note: &Note, default_user_id: Option<&str>) -> String {
    let mut query = format!("id={}", urlencoding::encode(&note.id));
    if let Some(user_id) = note.user_id.as_deref().or(default_user_id) {
        query.push_str(&format!("&user_id={}", urlencoding::encode(user_id)));
    }
    query
}

/// The note list page with the add form
pub fn notes_page(notes: &[Note], key_name: &str, default_user_id: Option<&str>) -> String {
    let mut items = String::new();
    for note in notes {
        let query = item_query(note, default_user_id);
        items.push_str(&format!(
            "<li><strong>{title}</strong> <small>{updated}</small>\
             <p>{content}</p>\
             <small>{key_name}: <code>{id}</code></small> \
             <a href=\"/edit?{query}\">edit</a> \
             <a href=\"/delete?{query}\">delete</a></li>\n",
            title = escape(&note.title),
            updated = escape(&note.updated_at),
            content = escape(&note.content),
            key_name = escape(key_name),
            id = escape(&note.id),
        ));
    }
    if items.is_empty() {
        items.push_str("<li>No notes yet.</li>\n");
    }

    let user_id_value = default_user_id.map(escape).unwrap_or_default();
    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>Notes</title></head><body>\n\
<h1>Notes</h1>\n\
<form method=\"post\" action=\"/add\">\n\
<input name=\"title\" placeholder=\"title\">\n\
<input name=\"content\" placeholder=\"content\">\n\
<input type=\"hidden\" name=\"user_id\" value=\"{user_id_value}\">\n\
<button type=\"submit\">add</button>\n\
</form>\n\
<ul>\n{items}</ul>\n\
</body></html>"
    )
}

/// The edit form for one note
pub fn edit_page(note: &Note, key_name: &str, user_id: Option<&str>) -> String {
    let user_id_value = note
        .user_id
        .as_deref()
        .or(user_id)
        .map(escape)
        .unwrap_or_default();
    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>Edit note</title></head><body>\n\
<h1>Edit note</h1>\n\
<p>{key_name}: <code>{id}</code></p>\n\
<form method=\"post\" action=\"/edit\">\n\
<input type=\"hidden\" name=\"id\" value=\"{id}\">\n\
<input type=\"hidden\" name=\"user_id\" value=\"{user_id_value}\">\n\
<input name=\"title\" value=\"{title}\">\n\
<textarea name=\"content\">{content}</textarea>\n\
<button type=\"submit\">save</button>\n\
</form>\n\
<p><a href=\"/\">back</a></p>\n\
</body></html>",
        key_name = escape(key_name),
        id = escape(&note.id),
        title = escape(&note.title),
        content = escape(&note.content),
    )
}
