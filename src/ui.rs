use crate::chart::{self, CIRCLE_RADIUS, STROKE_WIDTH};
use crate::i18n::Locale;
use crate::models::{DashboardSnapshot, StatusMessage};

pub fn render_index(snapshot: &DashboardSnapshot, locale: Locale) -> String {
    let labels = locale.labels();
    let upload = &snapshot.upload;
    let stats = &snapshot.stats;
    let reminders = &snapshot.reminders;

    let selection = match &upload.selected_file {
        Some(name) => format!(
            r#"<p class="selected">{} <strong>{}</strong></p>"#,
            labels.selected_file,
            escape_html(name)
        ),
        None => format!(r#"<p class="hint">{}</p>"#, labels.drop_hint),
    };

    let upload_disabled = upload.selected_file.is_none() || upload.is_uploading;
    let upload_label = if upload.is_uploading {
        labels.uploading
    } else {
        labels.upload
    };

    let legend = stats
        .legend
        .iter()
        .zip([labels.paid_full, labels.paid_partial, labels.not_paid])
        .map(|(entry, label)| {
            format!(
                r#"<div class="legend-item"><span class="swatch" style="background-color: {}"></span>{label} ({})</div>"#,
                entry.color, entry.display
            )
        })
        .collect::<String>();

    let stats_error = stats
        .error
        .as_deref()
        .map(|text| format!(r#"<p class="message error">{}</p>"#, escape_html(text)))
        .unwrap_or_default();

    let last_updated = stats
        .last_updated
        .map(|at| {
            format!(
                r#"<p class="subtitle">{} {}</p>"#,
                labels.last_updated,
                at.format("%H:%M:%S")
            )
        })
        .unwrap_or_default();

    // Compared by the page poll against `/api/state` to notice a settled refresh.
    let stats_stamp =
        serde_json::to_string(&(&stats.last_updated, &stats.error)).unwrap_or_default();

    let reminder_disabled = reminders.sending || stats.reminders_disabled;
    let reminder_label = if reminders.sending {
        labels.sending_reminders
    } else {
        labels.send_reminders
    };
    let reminder_message = reminders
        .outcome
        .as_ref()
        .map(|outcome| {
            let class = if outcome.is_error { "error" } else { "success" };
            format!(
                r#"<p class="message {class}">{}</p>"#,
                escape_html(&outcome.message_text)
            )
        })
        .unwrap_or_default();

    INDEX_HTML
        .replace("{{LANG}}", labels.lang)
        .replace("{{TITLE}}", labels.title)
        .replace("{{UPLOAD_TITLE}}", labels.upload_title)
        .replace("{{DRAGGING}}", if upload.is_dragging { " dragging" } else { "" })
        .replace("{{SELECTION}}", &selection)
        .replace("{{BROWSE}}", labels.browse)
        .replace("{{UPLOAD_DISABLED}}", disabled_attr(upload_disabled))
        .replace("{{UPLOAD_LABEL}}", upload_label)
        .replace("{{UPLOAD_MESSAGE}}", &render_message(upload.message.as_ref(), locale))
        .replace("{{STATS_STAMP}}", &escape_html(&stats_stamp))
        .replace("{{STATS_TITLE}}", labels.stats_title)
        .replace("{{DONUT}}", &render_donut(snapshot))
        .replace("{{TOTAL}}", &stats.total_people.to_string())
        .replace("{{PEOPLE}}", labels.people)
        .replace("{{LEGEND}}", &legend)
        .replace("{{STATS_ERROR}}", &stats_error)
        .replace("{{LAST_UPDATED}}", &last_updated)
        .replace("{{REMINDER_DISABLED}}", disabled_attr(reminder_disabled))
        .replace("{{REMINDER_LABEL}}", reminder_label)
        .replace("{{REMINDER_MESSAGE}}", &reminder_message)
}

/// Background ring plus one stroked circle per segment.
pub fn render_donut(snapshot: &DashboardSnapshot) -> String {
    let size = CIRCLE_RADIUS * 2.0 + STROKE_WIDTH;
    let center = CIRCLE_RADIUS + STROKE_WIDTH / 2.0;
    let circles = snapshot
        .stats
        .segments
        .iter()
        .map(|segment| {
            let (dash, gap) = segment.dash_array();
            format!(
                r#"<circle class="segment" cx="{center}" cy="{center}" r="{CIRCLE_RADIUS}" stroke-width="{STROKE_WIDTH}" stroke="{}" stroke-dasharray="{dash:.3} {gap:.3}" stroke-dashoffset="0" stroke-linecap="butt" style="transform-origin: center center; transform: rotate({:.3}deg)" />"#,
                segment.category.color(),
                segment.start_angle_degrees
            )
        })
        .collect::<String>();

    format!(
        r#"<svg height="{size}" width="{size}" viewBox="0 0 {size} {size}" data-circumference="{:.3}"><circle class="ring" cx="{center}" cy="{center}" r="{CIRCLE_RADIUS}" stroke-width="{STROKE_WIDTH}" />{circles}</svg>"#,
        chart::circumference()
    )
}

/// Error styling follows the locale's error prefix.
fn render_message(message: Option<&StatusMessage>, locale: Locale) -> String {
    match message {
        Some(message) => {
            let class = if locale.is_error_text(&message.text) {
                "error"
            } else {
                "success"
            };
            format!(
                r#"<p class="message {class}">{}</p>"#,
                escape_html(&message.text)
            )
        }
        None => String::new(),
    }
}

fn disabled_attr(disabled: bool) -> &'static str {
    if disabled { "disabled" } else { "" }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="{{LANG}}">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <style>
    :root {
      --bg-1: #f4f6f8;
      --ink: #2b2a28;
      --accent: #2f4858;
      --card: #ffffff;
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg-1);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(760px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.6rem, 4vw, 2.2rem);
      text-align: center;
    }

    .subtitle {
      margin: 0;
      color: #5f5c57;
      font-size: 0.9rem;
    }

    .uploader {
      border: 2px dashed #b8c2cc;
      border-radius: 18px;
      padding: 24px;
      display: grid;
      gap: 12px;
      justify-items: center;
    }

    .uploader.dragging {
      border-color: var(--accent);
      background: #eef3f7;
    }

    .file-input {
      display: none;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 12px 20px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
    }

    button:disabled {
      opacity: 0.5;
      cursor: not-allowed;
    }

    .message.success {
      color: #1e7e34;
    }

    .message.error {
      color: #c82333;
    }

    .stats {
      display: grid;
      gap: 16px;
      justify-items: center;
    }

    .donut {
      position: relative;
      display: grid;
      place-items: center;
    }

    .donut svg .ring {
      fill: none;
      stroke: #e9ecef;
    }

    .donut svg .segment {
      fill: none;
    }

    .total {
      position: absolute;
      display: grid;
      justify-items: center;
    }

    .total strong {
      font-size: 1.8rem;
    }

    .legend {
      display: flex;
      flex-wrap: wrap;
      gap: 16px;
      justify-content: center;
    }

    .swatch {
      display: inline-block;
      width: 14px;
      height: 14px;
      border-radius: 4px;
      margin-right: 6px;
    }
  </style>
</head>
<body>
  <main class="app">
    <h1>{{TITLE}}</h1>

    <section id="uploader" class="uploader{{DRAGGING}}">
      <h2>{{UPLOAD_TITLE}}</h2>
      {{SELECTION}}
      <input id="csv-file" class="file-input" type="file" accept=".csv" />
      <button id="browse-btn" type="button">{{BROWSE}}</button>
      <button id="upload-btn" type="button" {{UPLOAD_DISABLED}}>{{UPLOAD_LABEL}}</button>
      <div id="upload-message">{{UPLOAD_MESSAGE}}</div>
    </section>

    <section id="stats" class="stats" data-stamp="{{STATS_STAMP}}">
      <h2>{{STATS_TITLE}}</h2>
      <div class="donut">
        {{DONUT}}
        <div class="total"><strong>{{TOTAL}}</strong><span>{{PEOPLE}}</span></div>
      </div>
      <div class="legend">{{LEGEND}}</div>
      {{STATS_ERROR}}
      {{LAST_UPDATED}}
      <button id="reminder-btn" type="button" {{REMINDER_DISABLED}}>{{REMINDER_LABEL}}</button>
      {{REMINDER_MESSAGE}}
    </section>
  </main>

  <script>
    const uploader = document.getElementById('uploader');
    const fileInput = document.getElementById('csv-file');

    const post = async (url, options = {}) => {
      const res = await fetch(url, { method: 'POST', ...options });
      if (!res.ok) {
        throw new Error(await res.text());
      }
      return res.json();
    };

    const sendFile = async (file, source) => {
      const body = new FormData();
      if (file) {
        body.append('file', file);
      }
      await post(`/api/upload/select?source=${source}`, { body });
      window.location.reload();
    };

    const setDragging = (dragging) =>
      post('/api/upload/drag', {
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({ dragging })
      }).catch(console.error);

    uploader.addEventListener('dragover', (event) => {
      event.preventDefault();
      if (!uploader.classList.contains('dragging')) {
        uploader.classList.add('dragging');
        setDragging(true);
      }
    });

    uploader.addEventListener('dragleave', (event) => {
      event.preventDefault();
      uploader.classList.remove('dragging');
      setDragging(false);
    });

    uploader.addEventListener('drop', (event) => {
      event.preventDefault();
      uploader.classList.remove('dragging');
      const files = event.dataTransfer.files;
      sendFile(files && files.length > 0 ? files[0] : null, 'drop').catch(console.error);
    });

    document.getElementById('browse-btn').addEventListener('click', () => fileInput.click());

    fileInput.addEventListener('change', () => {
      const file = fileInput.files.length > 0 ? fileInput.files[0] : null;
      sendFile(file, 'browse').catch(console.error);
    });

    document.getElementById('upload-btn').addEventListener('click', (event) => {
      event.target.disabled = true;
      post('/api/upload').then(() => window.location.reload()).catch(console.error);
    });

    document.getElementById('reminder-btn').addEventListener('click', (event) => {
      event.target.disabled = true;
      post('/api/reminders').then(() => window.location.reload()).catch(console.error);
    });

    setInterval(async () => {
      const res = await fetch('/api/state');
      if (!res.ok) {
        return;
      }
      const state = await res.json();
      const stamp = JSON.stringify([state.stats.last_updated, state.stats.error]);
      if (!state.stats.loading && stamp !== document.getElementById('stats').dataset.stamp) {
        window.location.reload();
        return;
      }
      if (!state.upload.message) {
        document.getElementById('upload-message').innerHTML = '';
      }
    }, 1000);
  </script>
</body>
</html>
"#;
