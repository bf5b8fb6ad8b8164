//! HTML pages served by the web front end.

const STYLE: &str = "body{font-family:system-ui,sans-serif;max-width:40rem;margin:4rem auto;padding:0 1rem;color:#191414}\
a.button,button{background:#1db954;color:#fff;border:0;border-radius:2rem;padding:.7rem 1.6rem;font-size:1rem;text-decoration:none;cursor:pointer}\
input[type=text]{width:100%;padding:.6rem;margin:.5rem 0 1rem;font-size:1rem}\
.error{color:#b00020}";

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{title}</title><style>{STYLE}</style></head><body>{body}</body></html>",
        title = escape(title),
    )
}

/// Escapes text for use in HTML content and attribute values.
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

pub fn index() -> String {
    layout(
        "Titled",
        "<h1>Titled</h1>\
         <p>Turn an album into a playlist of the songs it samples.</p>\
         <p><a class=\"button\" href=\"/login\">Log in with Spotify</a></p>",
    )
}

pub fn home(user_id: &str, access_token: &str) -> String {
    let body = format!(
        "<h1>Generate a playlist</h1>\
         <form method=\"post\" action=\"/generatePlaylist\">\
         <input type=\"hidden\" name=\"userID\" value=\"{user_id}\">\
         <input type=\"hidden\" name=\"accessToken\" value=\"{access_token}\">\
         <label for=\"albumURL\">Spotify album link</label>\
         <input type=\"text\" id=\"albumURL\" name=\"albumURL\" \
         placeholder=\"https://open.spotify.com/album/...\" required>\
         <button type=\"submit\">Generate</button>\
         </form>",
        user_id = escape(user_id),
        access_token = escape(access_token),
    );
    layout("Titled - Generate", &body)
}

pub fn playlist(external_url: &str, playlist_id: &str, album_name: &str, tracks: usize) -> String {
    let body = format!(
        "<h1>Playlist ready</h1>\
         <p>{tracks} tracks inspired by <strong>{album}</strong>.</p>\
         <p><a class=\"button\" href=\"{url}\" target=\"_blank\" rel=\"noopener\">Open in Spotify</a></p>\
         <p><small>Playlist ID: {id}</small></p>\
         <p><a href=\"/home\">Make another</a></p>",
        album = escape(album_name),
        url = escape(external_url),
        id = escape(playlist_id),
    );
    layout("Titled - Playlist ready", &body)
}

pub fn error(message: &str) -> String {
    let body = format!(
        "<h1>Something went wrong</h1><p class=\"error\">{}</p><p><a href=\"/home\">Back</a></p>",
        escape(message)
    );
    layout("Titled - Error", &body)
}
