use catalog::School;

use crate::config::Messages;

/// Escapes the five HTML-significant characters.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn popup_html(school: &School, messages: &Messages) -> String {
    let name = escape_html(&school.name);
    let city = escape_html(&school.city);
    let desc = escape_html(&school.description);

    let photo = school
        .photo
        .as_deref()
        .map(|src| {
            format!(
                r#"<img src="{}" alt="{name}" style="width:100%;max-width:280px;border-radius:12px;margin:8px 0;" />"#,
                escape_html(src)
            )
        })
        .unwrap_or_default();
    let link = school
        .link
        .as_deref()
        .map(|href| {
            format!(
                r#"<div style="margin-top:8px;"><a href="{}" target="_blank" rel="noopener">{}</a></div>"#,
                escape_html(href),
                escape_html(&messages.open_link)
            )
        })
        .unwrap_or_default();
    let order = school
        .order
        .map(|o| {
            format!(
                r#"<div style="opacity:.8;font-size:12px;margin-top:6px;">{}</div>"#,
                escape_html(&messages.route_label(o))
            )
        })
        .unwrap_or_default();

    format!(
        r#"<div style="min-width:240px;max-width:320px;"><div style="font-weight:800;margin-bottom:2px;">{name}</div><div style="opacity:.8;margin-bottom:6px;">{city}</div>{photo}<div style="font-size:13px;line-height:1.35;">{desc}</div>{link}{order}</div>"#
    )
}

/// Inner markup of one list row. The row element itself carries the id.
pub fn list_item_html(school: &School) -> String {
    let order = school
        .order
        .map(|o| format!(" · #{o}"))
        .unwrap_or_default();
    format!(
        r#"<div class="name">{}</div><div class="meta">{}{order}</div>"#,
        escape_html(&school.name),
        escape_html(&school.city)
    )
}

/// The whole result list; an empty result renders a single inert row.
pub fn list_html<'a>(schools: impl IntoIterator<Item = &'a School>, messages: &Messages) -> String {
    let rows: String = schools
        .into_iter()
        .map(|s| {
            format!(
                r#"<li data-school-id="{}">{}</li>"#,
                escape_html(s.id.as_str()),
                list_item_html(s)
            )
        })
        .collect();
    if rows.is_empty() {
        empty_list_html(messages)
    } else {
        rows
    }
}

pub fn empty_list_html(messages: &Messages) -> String {
    format!(
        r#"<li style="cursor:default;opacity:.8;">{}</li>"#,
        escape_html(&messages.no_results)
    )
}
