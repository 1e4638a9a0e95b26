use crate::models::{DayView, HourSlotView};

const EXPLAIN: &str = "Habit tracker for obsessive maniacs";
const DELETE: &str = "Delete all saved data";
const NEW_DAY: &str = "New day will appear tomorrow";

pub fn render_index(goal: &str, timeline: &[DayView]) -> String {
    let days: String = timeline.iter().map(render_day).collect();
    INDEX_HTML
        .replace("{{EXPLAIN}}", EXPLAIN)
        .replace("{{DELETE}}", DELETE)
        .replace("{{NEW_DAY}}", NEW_DAY)
        .replace("{{DAYS}}", &days)
        // Last, so goal text is never expanded as a placeholder.
        .replace("{{GOAL}}", &escape_html(goal))
}

fn render_day(day: &DayView) -> String {
    let rows: String = day.blocks.iter().map(|hours| render_block(hours)).collect();
    format!(
        "<li class=\"day\"><h4 class=\"day-title\">{}</h4>{rows}</li>\n",
        escape_html(&day.title)
    )
}

fn render_block(hours: &[HourSlotView]) -> String {
    let slots: String = hours.iter().map(render_slot).collect();
    format!("<div class=\"block\">{slots}</div>")
}

fn render_slot(slot: &HourSlotView) -> String {
    format!(
        "<label class=\"slot\"><input type=\"checkbox\" name=\"{field}\"{checked} /> {hour}</label>",
        field = escape_html(&slot.field),
        checked = if slot.checked { " checked" } else { "" },
        hour = escape_html(&slot.hour),
    )
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>ControlFreakApp</title>
  <style>
    :root {
      --bg: #141414;
      --panel: #1f1f1f;
      --ink: #e8e8e8;
      --muted: #8c8c8c;
      --accent: #177ddc;
      --danger: #d32029;
      --rule: #303030;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: -apple-system, "Segoe UI", Roboto, sans-serif;
      padding: 32px 16px 64px;
    }

    .app {
      width: min(760px, 100%);
      margin: 0 auto;
    }

    h1 {
      font-size: 2.2rem;
      margin: 0 0 12px;
    }

    .explanation {
      cursor: help;
      color: var(--accent);
      font-size: 1.2rem;
    }

    .goal-row {
      display: flex;
      align-items: center;
      gap: 12px;
    }

    .goal-form {
      flex: 1;
      display: flex;
      gap: 8px;
    }

    .goal-form input {
      flex: 1;
      background: transparent;
      border: 1px solid transparent;
      color: var(--ink);
      font-size: 1.5rem;
      font-weight: 600;
      padding: 4px 6px;
    }

    .goal-form input:focus {
      border-color: var(--accent);
      outline: none;
    }

    button {
      background: none;
      border: 1px solid var(--rule);
      color: var(--ink);
      border-radius: 6px;
      padding: 6px 12px;
      cursor: pointer;
    }

    button.danger {
      color: var(--danger);
      border-color: var(--danger);
    }

    hr {
      border: 0;
      border-top: 2px solid var(--rule);
      margin: 20px 0;
    }

    .timeline {
      list-style: none;
      margin: 0;
      padding: 0 0 0 20px;
      border-left: 2px solid var(--rule);
    }

    .day,
    .pending {
      position: relative;
      padding: 0 0 24px 12px;
    }

    .day::before,
    .pending::before {
      content: "";
      position: absolute;
      left: -27px;
      top: 6px;
      width: 10px;
      height: 10px;
      border-radius: 50%;
      border: 2px solid var(--accent);
      background: var(--bg);
    }

    .pending {
      color: var(--muted);
    }

    .day-title {
      margin: 0 0 8px;
      font-size: 1.1rem;
    }

    .block {
      display: grid;
      grid-template-columns: repeat(6, 1fr);
      gap: 4px;
      margin-bottom: 4px;
    }

    .slot {
      font-size: 0.85rem;
      white-space: nowrap;
    }

    .status {
      min-height: 1.2em;
      color: var(--muted);
      font-size: 0.85rem;
    }
  </style>
</head>
<body>
  <main class="app">
    <h1>ControlFreakApp <span class="explanation" title="{{EXPLAIN}}">?</span></h1>

    <div class="goal-row">
      <form class="goal-form" method="post" action="/goal">
        <input name="goal" value="{{GOAL}}" aria-label="Goal" required />
        <button type="submit">Save goal</button>
      </form>
      <form id="reset-form" method="post" action="/reset">
        <button class="danger" type="submit" title="{{DELETE}}">Delete</button>
      </form>
    </div>

    <hr />

    <form id="calendar-form" method="post" action="/calendar">
      <ol class="timeline">
        <li class="pending" title="{{NEW_DAY}}">{{NEW_DAY}}</li>
{{DAYS}}      </ol>
      <noscript><button type="submit">Save</button></noscript>
    </form>
    <p class="status" id="status"></p>
  </main>

  <script>
    const status = document.getElementById('status');
    const calendarForm = document.getElementById('calendar-form');
    const resetForm = document.getElementById('reset-form');

    const setStatus = (text) => {
      status.textContent = text;
    };

    const collectValues = () => {
      const values = {};
      calendarForm.querySelectorAll('input[type=checkbox]').forEach((box) => {
        values[box.name] = box.checked;
      });
      return values;
    };

    calendarForm.addEventListener('change', async () => {
      setStatus('Saving...');
      try {
        const res = await fetch('/api/calendar', {
          method: 'POST',
          headers: { 'content-type': 'application/json' },
          body: JSON.stringify({ values: collectValues() })
        });
        if (!res.ok) {
          throw new Error((await res.text()) || 'Request failed');
        }
        setStatus('Saved');
        setTimeout(() => setStatus(''), 1200);
      } catch (err) {
        setStatus(err.message);
      }
    });

    resetForm.addEventListener('submit', (event) => {
      const ok = window.confirm("Delete all?\n\nYou won't be able to recover your data after the deletion");
      if (!ok) {
        event.preventDefault();
      }
    });
  </script>
</body>
</html>
"#;
