//! Root redirect and the static debugging page

use axum::response::{Html, Redirect};

pub(crate) async fn root() -> Redirect {
    Redirect::temporary("/ui")
}

pub(crate) async fn page() -> Html<&'static str> {
    Html(UI_PAGE)
}

const UI_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>otap live capture</title>
  <style>
    body { margin: 0; font-family: ui-monospace, monospace; background: #10141f; color: #e5ecf7; }
    .wrap { max-width: 960px; margin: 0 auto; padding: 24px; }
    h1 { font-size: 20px; color: #48d9b3; }
    label { display: block; margin: 10px 0 4px; font-size: 12px; color: #93a4c4; }
    textarea { width: 100%; min-height: 160px; background: #0b0f18; color: #e5ecf7; border: 1px solid #2a3550; border-radius: 6px; padding: 8px; box-sizing: border-box; }
    button { margin-top: 12px; padding: 8px 18px; background: #48d9b3; color: #0b0f18; border: 0; border-radius: 6px; cursor: pointer; }
    pre { background: #0b0f18; border: 1px solid #2a3550; border-radius: 6px; padding: 12px; min-height: 240px; overflow: auto; white-space: pre-wrap; }
  </style>
</head>
<body>
  <div class="wrap">
    <h1>otap live capture</h1>
    <label for="req">stream request</label>
    <textarea id="req">{
  "signals": ["metrics"],
  "metric_names": [],
  "max_batches": 5,
  "timeout_seconds": 30
}</textarea>
    <button id="start">start stream</button>
    <pre id="out"></pre>
  </div>
  <script>
    const out = document.getElementById('out');
    document.getElementById('start').addEventListener('click', async () => {
      out.textContent = '';
      const response = await fetch('/v1/capture/stream', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: document.getElementById('req').value,
      });
      if (!response.ok) {
        out.textContent = 'HTTP ' + response.status + '\n' + await response.text();
        return;
      }
      const reader = response.body.getReader();
      const decoder = new TextDecoder();
      for (;;) {
        const { done, value } = await reader.read();
        if (done) break;
        out.textContent += decoder.decode(value);
        out.scrollTop = out.scrollHeight;
      }
    });
  </script>
</body>
</html>
"#;
