//! Server-rendered HTML for the three navigable views.

pub mod about;
pub mod home;
pub mod recommender;

use std::fmt::Write;

pub const APP_TITLE: &str = "Book Recommendation App";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Home,
    Recommender,
    About,
}

impl Nav {
    const ALL: [Nav; 3] = [Nav::Home, Nav::Recommender, Nav::About];

    fn label(self) -> &'static str {
        match self {
            Nav::Home => "Home",
            Nav::Recommender => "Recommender",
            Nav::About => "About",
        }
    }

    fn href(self) -> &'static str {
        match self {
            Nav::Home => "/",
            Nav::Recommender => "/recommender",
            Nav::About => "/about",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

impl NoticeLevel {
    fn class(self) -> &'static str {
        match self {
            NoticeLevel::Info => "notice info",
            NoticeLevel::Warning => "notice warning",
            NoticeLevel::Error => "notice error",
        }
    }
}

/// Escape text for HTML element content and quoted attribute values.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

pub fn notice(level: NoticeLevel, message: &str) -> String {
    format!(
        r#"<div class="{}">{}</div>"#,
        level.class(),
        escape(message)
    )
}

/// Cover image with an optional caption; a placeholder when the artifact has
/// no image URL.
pub fn cover(url: Option<&str>, caption: Option<&str>) -> String {
    let mut html = String::from(r#"<figure class="cover">"#);
    match url {
        Some(url) if !url.trim().is_empty() => {
            let _ = write!(
                html,
                r#"<img src="{}" alt="{}">"#,
                escape(url),
                escape(caption.unwrap_or("Book cover"))
            );
        }
        _ => html.push_str(r#"<div class="cover-missing">No cover</div>"#),
    }
    if let Some(caption) = caption {
        let _ = write!(html, "<figcaption>{}</figcaption>", escape(caption));
    }
    html.push_str("</figure>");
    html
}

/// Full page: sidebar navigation plus `body`.
pub fn layout(active: Nav, body: &str) -> String {
    let mut nav = String::new();
    for item in Nav::ALL {
        let class = if item == active { " class=\"active\"" } else { "" };
        let _ = write!(
            nav,
            r#"<li><a href="{}"{}>{}</a></li>"#,
            item.href(),
            class,
            item.label()
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title} - {section}</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 0; display: flex; background: #f5f5f5; }}
        nav {{ width: 200px; min-height: 100vh; background: #fff; padding: 24px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }}
        nav ul {{ list-style: none; padding: 0; }}
        nav a {{ display: block; padding: 8px 0; color: #333; text-decoration: none; }}
        nav a.active {{ font-weight: bold; color: #dc3545; }}
        main {{ flex: 1; padding: 24px 40px; }}
        .grid {{ display: grid; gap: 16px; margin-bottom: 16px; }}
        .card {{ background: #fff; padding: 12px; border-radius: 8px; }}
        .cover img {{ width: 100%; }}
        .cover-missing {{ height: 180px; display: flex; align-items: center; justify-content: center; background: #eee; color: #888; }}
        .notice {{ padding: 12px; border-radius: 4px; margin: 12px 0; }}
        .notice.info {{ background: #e7f1ff; }}
        .notice.warning {{ background: #fff3cd; }}
        .notice.error {{ background: #f8d7da; }}
        .button {{ display: inline-block; padding: 6px 12px; background: #dc3545; color: #fff; text-decoration: none; border-radius: 4px; border: none; }}
        table {{ border-collapse: collapse; background: #fff; }}
        th, td {{ padding: 6px 10px; border: 1px solid #ddd; text-align: left; }}
    </style>
</head>
<body>
    <nav>
        <h3>Navigation</h3>
        <ul>{nav}</ul>
    </nav>
    <main>
        <h1>{title}</h1>
        {body}
    </main>
</body>
</html>"#,
        title = APP_TITLE,
        section = active.label(),
        nav = nav,
        body = body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_layout_marks_active_section() {
        let page = layout(Nav::About, "<p>hi</p>");
        assert!(page.contains(r#"<a href="/about" class="active">About</a>"#));
        assert!(page.contains(r#"<a href="/">Home</a>"#));
        assert!(page.contains("<p>hi</p>"));
    }

    #[test]
    fn test_cover_placeholder() {
        let html = cover(None, Some("Wild <Animus>"));
        assert!(html.contains("No cover"));
        assert!(html.contains("Wild &lt;Animus&gt;"));
    }
}
