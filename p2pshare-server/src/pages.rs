//! HTML pages for browser-based senders and receivers

const STYLE: &str = r#"<style>
body {
    font-family: system-ui, -apple-system, "Segoe UI", Roboto, sans-serif;
    background: #0f172a;
    color: #f1f5f9;
    display: flex;
    align-items: center;
    justify-content: center;
    height: 100vh;
    margin: 0;
}
.card {
    background: #1e293b;
    padding: 2rem;
    border-radius: 1.25rem;
    text-align: center;
    width: 90%;
    max-width: 480px;
    border: 1px solid #334155;
}
a, button {
    display: inline-block;
    background: #3b82f6;
    color: white;
    padding: 0.75rem 1.5rem;
    border-radius: 9999px;
    border: none;
    text-decoration: none;
    font-weight: 600;
    cursor: pointer;
}
#link { word-break: break-all; margin-bottom: 1rem; }
</style>"#;

/// Upload page: creates a session, shows its link, and posts the chosen file
pub fn upload_page() -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>p2pshare</title>
{STYLE}
</head>
<body>
<div class="card">
  <h2>Send a file</h2>
  <p>Share this link, then upload. The file streams straight to the receiver.</p>
  <div id="link">Generating link...</div>
  <form id="form">
    <input type="file" name="senderfile" id="file" required><br><br>
    <button type="submit">Upload</button>
  </form>
  <p id="status"></p>
</div>
<script>
let id = "";
fetch("/id").then(r => r.text()).then(t => {{
  const link = t.trim();
  id = new URL(link).searchParams.get("id");
  document.getElementById("link").textContent = link;
}});
document.getElementById("form").addEventListener("submit", async e => {{
  e.preventDefault();
  const file = document.getElementById("file").files[0];
  if (!file) return;
  const data = new FormData();
  data.append("senderfile", file);
  const status = document.getElementById("status");
  status.textContent = "Waiting for the receiver...";
  try {{
    const resp = await fetch("/upload?id=" + id, {{ method: "POST", body: data }});
    status.textContent = resp.ok ? "Upload complete" : "Upload failed: " + await resp.text();
  }} catch (err) {{
    status.textContent = "Upload aborted or connection lost";
  }}
}});
</script>
</body>
</html>
"#
    )
}

/// Download page pointing the receiver at the streaming route
pub fn download_page(receive_link: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>File Ready to Download</title>
{STYLE}
</head>
<body>
<div class="card">
  <h2>Your file is ready</h2>
  <p>The download starts as soon as the sender uploads.</p>
  <a href="{href}" download>Download</a>
</div>
</body>
</html>
"#,
        href = escape_html(receive_link)
    )
}

/// Escape text for inclusion in HTML content or a quoted attribute
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
