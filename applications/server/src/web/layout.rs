//! Root HTML layout
//!
//! Every server-rendered page goes through [`render_root_layout`]. The
//! session is embedded as JSON in a non-executable script element so the
//! client can pick it up without another request.

use shipcv_core::SessionUser;

pub const TITLE: &str = "ShipCV - ATS Resume Builder";
pub const DESCRIPTION: &str = "Fill the form to get an ATS-winning resume.";

/// Element id of the embedded session JSON
pub const SESSION_ELEMENT_ID: &str = "shipcv-session";

/// Element id of the wrapper around page content
pub const AUTH_PROVIDER_ID: &str = "shipcv-auth-provider";

/// Wrap `content` in the document shell
///
/// `content` is inserted verbatim; callers pass markup they own.
pub fn render_root_layout(content: &str, session: Option<&SessionUser>) -> String {
    let session_json = session_json(session);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{TITLE}</title>
<meta name="description" content="{DESCRIPTION}">
<link rel="stylesheet" href="/globals.css">
</head>
<body class="font-sans">
<script type="application/json" id="{SESSION_ELEMENT_ID}">{session_json}</script>
<div id="{AUTH_PROVIDER_ID}">{content}</div>
</body>
</html>
"#
    )
}

fn session_json(session: Option<&SessionUser>) -> String {
    let json = match session {
        Some(session) => match serde_json::to_string(session) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize session: {}", e);
                "null".to_string()
            }
        },
        None => "null".to_string(),
    };

    escape_script_json(&json)
}

/// Make JSON safe to embed in a `<script>` element
///
/// The escapes are still valid JSON string escapes, so the payload parses
/// back to the same value.
fn escape_script_json(json: &str) -> String {
    let mut escaped = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => escaped.push_str("\\u003c"),
            '>' => escaped.push_str("\\u003e"),
            '&' => escaped.push_str("\\u0026"),
            '\u{2028}' => escaped.push_str("\\u2028"),
            '\u{2029}' => escaped.push_str("\\u2029"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use shipcv_core::UserId;

    fn embedded_json(html: &str) -> &str {
        let open = format!(r#"<script type="application/json" id="{SESSION_ELEMENT_ID}">"#);
        let start = html.find(&open).unwrap() + open.len();
        let end = start + html[start..].find("</script>").unwrap();
        &html[start..end]
    }

    #[test]
    fn renders_document_shell() {
        let html = render_root_layout("<main>hi</main>", None);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<html lang="en">"#));
        assert!(html.contains("<title>ShipCV - ATS Resume Builder</title>"));
        assert!(html.contains(r#"content="Fill the form to get an ATS-winning resume.""#));
        assert!(html.contains(r#"<body class="font-sans">"#));
        assert!(html.contains(r#"<div id="shipcv-auth-provider"><main>hi</main></div>"#));
        assert_eq!(embedded_json(&html), "null");
    }

    #[test]
    fn embeds_session_as_json() {
        let mut session = SessionUser::new(UserId::new("u1"), "ada@example.com");
        session.target_role = Some("Backend Engineer".to_string());

        let html = render_root_layout("", Some(&session));
        let parsed: SessionUser = serde_json::from_str(embedded_json(&html)).unwrap();

        assert_eq!(parsed, session);
    }

    #[test]
    fn session_cannot_close_script_element() {
        let mut session = SessionUser::new(UserId::new("u1"), "ada@example.com");
        session.name = Some("</script><script>alert(1)</script>".to_string());

        let html = render_root_layout("", Some(&session));
        let json = embedded_json(&html);

        assert!(!json.contains('<'));
        let parsed: SessionUser = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.name, session.name);
    }
}
