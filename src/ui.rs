use crate::models::Habit;
use crate::stats::{current_streak, date_key, is_completed_on};
use chrono::NaiveDate;

pub fn render_index(today: NaiveDate, habits: &[Habit]) -> String {
    let done = habits
        .iter()
        .filter(|habit| is_completed_on(habit, today))
        .count();

    let rows = if habits.is_empty() {
        EMPTY_ROW.to_string()
    } else {
        habits
            .iter()
            .map(|habit| render_row(habit, today))
            .collect::<Vec<_>>()
            .join("\n")
    };

    INDEX_HTML
        .replace("{{DATE}}", &date_key(today))
        .replace("{{DONE}}", &done.to_string())
        .replace("{{TOTAL}}", &habits.len().to_string())
        .replace("{{ROWS}}", &rows)
}

fn render_row(habit: &Habit, today: NaiveDate) -> String {
    let completed = is_completed_on(habit, today);
    ROW_HTML
        .replace("{{STATE}}", if completed { "done" } else { "open" })
        .replace("{{CHECK}}", if completed { "✓" } else { "○" })
        .replace("{{STREAK}}", &current_streak(habit, today).to_string())
        .replace("{{ID}}", &escape_html(&habit.id))
        .replace("{{EMOJI}}", &escape_html(&habit.emoji))
        .replace("{{NAME}}", &escape_html(&habit.name))
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const EMPTY_ROW: &str =
    r#"<li class="empty">No habits yet. Create one with <code>POST /api/habits</code>.</li>"#;

const ROW_HTML: &str = r#"<li class="habit {{STATE}}">
        <button type="button" data-id="{{ID}}" aria-label="toggle {{NAME}}">{{CHECK}}</button>
        <span class="emoji">{{EMOJI}}</span>
        <span class="name">{{NAME}}</span>
        <span class="streak">{{STREAK}} 🔥</span>
      </li>"#;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Lunar</title>
  <style>
    :root {
      --bg: #14122b;
      --card: #221f45;
      --ink: #f2efff;
      --muted: #a29fc7;
      --accent: #b69cff;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, #2c2760, var(--bg) 65%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: start center;
      padding: 40px 18px;
    }

    .app {
      width: min(560px, 100%);
      display: grid;
      gap: 20px;
    }

    h1 {
      margin: 0;
      font-size: 2rem;
    }

    .subtitle {
      margin: 4px 0 0;
      color: var(--muted);
    }

    ul {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 12px;
    }

    .habit {
      display: grid;
      grid-template-columns: auto auto 1fr auto;
      align-items: center;
      gap: 12px;
      background: var(--card);
      border-radius: 18px;
      padding: 14px 18px;
    }

    .habit.done .name {
      text-decoration: line-through;
      color: var(--muted);
    }

    .habit button {
      appearance: none;
      border: 2px solid var(--accent);
      background: transparent;
      color: var(--ink);
      border-radius: 999px;
      width: 36px;
      height: 36px;
      font-size: 1rem;
      cursor: pointer;
    }

    .habit.done button {
      background: var(--accent);
      color: var(--bg);
    }

    .emoji {
      font-size: 1.4rem;
    }

    .streak {
      color: var(--accent);
      font-weight: 600;
    }

    .empty {
      color: var(--muted);
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>🌙 Lunar</h1>
      <p class="subtitle">{{DATE}} &middot; {{DONE}} of {{TOTAL}} done</p>
    </header>
    <ul>
      {{ROWS}}
    </ul>
  </main>
  <script>
    document.querySelectorAll('.habit button').forEach((button) => {
      button.addEventListener('click', async () => {
        const res = await fetch(`/api/habits/${encodeURIComponent(button.dataset.id)}/toggle`, {
          method: 'POST',
        });
        if (res.ok) {
          window.location.reload();
        }
      });
    });
  </script>
</body>
</html>
"#;
