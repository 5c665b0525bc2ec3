//! HTML pages of the dashboard.

use darkage_config::{keys, ConfigDocument, ConfigValue};
use std::fmt::Write as _;

const STYLE: &str = "body{font-family:sans-serif;background:#1e1f22;color:#dbdee1;margin:0}\
main{max-width:760px;margin:2rem auto;padding:0 1rem}\
fieldset{border:1px solid #3f4147;border-radius:6px;margin-bottom:1rem}\
label{display:block;margin:.5rem 0 .2rem}\
input[type=text],input[type=number],input[type=password],textarea{width:100%;box-sizing:border-box;padding:.4rem;background:#2b2d31;color:inherit;border:1px solid #3f4147}\
.check{display:inline-block;margin-right:1rem}\
button,.button{background:#5865f2;color:#fff;border:0;padding:.5rem 1rem;border-radius:4px;text-decoration:none;cursor:pointer}\
.error{color:#f23f43}.notice{color:#23a55a}";

/// Escapes text for use in HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<main>\n{body}\n</main>\n</body>\n</html>\n",
        escape_html(title)
    )
}

/// Login page with the password form and, when configured, a Discord button.
pub fn render_login(error: Option<&str>, oauth_enabled: bool) -> String {
    let mut body = String::from("<h1>DarkAge Dashboard</h1>\n");
    if let Some(error) = error {
        let _ = writeln!(body, "<p class=\"error\">{}</p>", escape_html(error));
    }
    body.push_str(
        "<form method=\"post\" action=\"/login\">\n\
         <label for=\"password\">Password</label>\n\
         <input type=\"password\" id=\"password\" name=\"password\" required autofocus>\n\
         <p><button type=\"submit\">Log in</button></p>\n</form>\n",
    );
    if oauth_enabled {
        body.push_str("<p><a class=\"button\" href=\"/oauth/login\">Log in with Discord</a></p>\n");
    }
    layout("Login", &body)
}

/// Config editor showing the current values of `document`.
pub fn render_dashboard(document: &ConfigDocument, user: &str, saved: bool) -> String {
    let text = |path: &str| {
        escape_html(document.get(path).and_then(ConfigValue::as_str).unwrap_or_default())
    };
    let number = |path: &str| document.get(path).and_then(ConfigValue::as_i64).unwrap_or_default();
    let vote_links = document
        .get(keys::LINK_VOTE)
        .and_then(ConfigValue::as_string_list)
        .unwrap_or_default()
        .join("\n");
    let checked = |on: bool| if on { " checked" } else { "" };

    let mut body = String::new();
    let _ = writeln!(
        body,
        "<h1>DarkAge Dashboard</h1>\n<p>Logged in as <strong>{}</strong> · <a href=\"/logout\">Log out</a></p>",
        escape_html(user)
    );
    if saved {
        body.push_str("<p class=\"notice\">Configuration saved.</p>\n");
    }
    body.push_str("<form method=\"post\" action=\"/config/update\">\n");

    let _ = writeln!(
        body,
        "<fieldset><legend>Minecraft server</legend>\n\
         <label for=\"minecraft_ip\">Address</label>\
         <input type=\"text\" id=\"minecraft_ip\" name=\"minecraft_ip\" value=\"{}\" required>\n\
         <label for=\"minecraft_port\">Port</label>\
         <input type=\"number\" id=\"minecraft_port\" name=\"minecraft_port\" min=\"1\" max=\"65535\" value=\"{}\" required>\n\
         </fieldset>",
        text(keys::MINECRAFT_IP),
        number(keys::MINECRAFT_PORT)
    );

    let _ = writeln!(
        body,
        "<fieldset><legend>Links</legend>\n\
         <label for=\"link_website\">Website</label>\
         <input type=\"text\" id=\"link_website\" name=\"link_website\" value=\"{}\">\n\
         <label for=\"link_store\">Store</label>\
         <input type=\"text\" id=\"link_store\" name=\"link_store\" value=\"{}\">\n\
         <label for=\"link_vote\">Vote links (one per line)</label>\
         <textarea id=\"link_vote\" name=\"link_vote\" rows=\"4\">{}</textarea>\n\
         </fieldset>",
        text(keys::LINK_WEBSITE),
        text(keys::LINK_STORE),
        escape_html(&vote_links)
    );

    let _ = writeln!(
        body,
        "<fieldset><legend>Rules</legend>\n\
         <textarea id=\"rules\" name=\"rules\" rows=\"6\">{}</textarea>\n</fieldset>",
        text(keys::RULES)
    );

    let welcome_enabled = document
        .get(keys::WELCOME_ENABLED)
        .and_then(ConfigValue::as_bool)
        .unwrap_or_default();
    let _ = writeln!(
        body,
        "<fieldset><legend>Welcome messages</legend>\n\
         <label class=\"check\"><input type=\"checkbox\" name=\"welcome_enabled\" value=\"true\"{}> Enabled</label>\n\
         <label for=\"welcome_channel_id\">Channel ID</label>\
         <input type=\"text\" id=\"welcome_channel_id\" name=\"welcome_channel_id\" inputmode=\"numeric\" value=\"{}\">\n\
         <label for=\"welcome_message\">Message, <code>{{user}}</code> becomes the new member</label>\
         <input type=\"text\" id=\"welcome_message\" name=\"welcome_message\" value=\"{}\">\n\
         </fieldset>",
        checked(welcome_enabled),
        number(keys::WELCOME_CHANNEL_ID),
        text(keys::WELCOME_MESSAGE)
    );

    body.push_str("<fieldset><legend>Commands</legend>\n");
    if let Some(commands) = document.get(keys::COMMANDS).and_then(ConfigValue::as_map) {
        for (name, enabled) in commands {
            let name = escape_html(name);
            let _ = writeln!(
                body,
                "<label class=\"check\"><input type=\"checkbox\" name=\"cmd_{name}\" value=\"true\"{}> /{name}</label>",
                checked(enabled.as_bool().unwrap_or(true))
            );
        }
    }
    body.push_str("</fieldset>\n<p><button type=\"submit\">Save</button></p>\n</form>\n");

    layout("Dashboard", &body)
}
