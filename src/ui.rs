use crate::history;
use crate::models::{HabitEntry, StoreData};

pub fn render_index(store: &StoreData, entries: &[HabitEntry]) -> String {
    let fun = history::fun_mode(store);
    let done = history::done_flags(store);
    let mut page = INDEX_HTML
        .replace("{{FUN_CLASS}}", if fun { "fun" } else { "" })
        .replace("{{FUN_LABEL}}", if fun { "Normal mode" } else { "Fun mode" })
        .replace("{{HISTORY}}", &render_history_list(entries));
    for (index, key) in history::HABIT_KEYS.iter().enumerate() {
        let value = escape_html(store.get(key).unwrap_or(""));
        page = page.replace(&format!("{{{{HAB{}}}}}", index + 1), &value);
        page = page.replace(
            &format!("{{{{RES{}}}}}", index + 1),
            if done[index] { "✔️" } else { "" },
        );
    }
    page
}

pub fn render_stats() -> String {
    STATS_HTML.to_string()
}

fn render_history_list(entries: &[HabitEntry]) -> String {
    if entries.is_empty() {
        return "<p class=\"empty\">No sessions logged yet.</p>".to_string();
    }
    let mut out = String::new();
    for entry in entries {
        out.push_str("<div class=\"session\">");
        for slot in entry.slots() {
            if !slot.trim().is_empty() {
                out.push_str("<p>✔️ ");
                out.push_str(&escape_html(slot));
                out.push_str("</p>");
            }
        }
        out.push_str("<small>");
        out.push_str(&escape_html(&entry.date));
        out.push_str("</small></div>");
    }
    out
}

/// Habit names are free text typed by the user; escape them before they
/// land inside markup or an attribute value.
fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
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
  <title>Habit Tracker</title>
  <style>
    :root {
      --bg: #eef2f7;
      --ink: #23313f;
      --accent: #3b7dd8;
      --good: #2d8a57;
      --danger: #c0452f;
      --card: #ffffff;
    }

    * { box-sizing: border-box; }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(160deg, var(--bg), #dde7f3);
      color: var(--ink);
      font-family: "Segoe UI", "Helvetica Neue", sans-serif;
      display: flex;
      justify-content: center;
      padding: 28px 16px 44px;
    }

    body.fun {
      background: linear-gradient(160deg, #fde7f0, #e7f0fd 55%, #e9fde7);
    }

    .page {
      width: min(720px, 100%);
      display: grid;
      gap: 20px;
    }

    .card {
      background: var(--card);
      border-radius: 14px;
      padding: 22px;
      box-shadow: 0 10px 30px rgba(35, 49, 63, 0.12);
    }

    h1 { margin: 0 0 4px; font-size: 1.8rem; }

    .tagline { margin: 0; color: #5d6b7a; }

    .slot-row {
      display: grid;
      grid-template-columns: 1fr auto auto;
      gap: 10px;
      align-items: center;
      margin-bottom: 10px;
    }

    .slot-row input {
      padding: 10px 12px;
      border: 1px solid #c6d2e0;
      border-radius: 8px;
      font-size: 1rem;
    }

    .mark { width: 1.6em; text-align: center; font-size: 1.1rem; }

    button {
      border: none;
      border-radius: 8px;
      padding: 10px 16px;
      font-size: 0.95rem;
      font-weight: 600;
      cursor: pointer;
      background: #d9e3ef;
      color: var(--ink);
    }

    button.primary { background: var(--accent); color: white; }
    button.danger { background: var(--danger); color: white; }

    .toolbar {
      display: flex;
      flex-wrap: wrap;
      gap: 10px;
      align-items: center;
    }

    .toolbar a {
      font-weight: 600;
      color: var(--accent);
      text-decoration: none;
    }

    .session { border-bottom: 1px solid #e3eaf2; padding: 8px 0; }
    .session p { margin: 2px 0; }
    .session small { color: #76839a; }
    .empty { color: #76839a; }

    .status { min-height: 1.2em; color: #5d6b7a; font-size: 0.95rem; }
    .status[data-type="error"] { color: var(--danger); }
    .status[data-type="ok"] { color: var(--good); }
  </style>
</head>
<body class="{{FUN_CLASS}}">
  <main class="page">
    <section class="card">
      <h1>Habit Tracker</h1>
      <p class="tagline">Log today's four habits, keep the streak alive.</p>
    </section>

    <section class="card">
      <div class="slot-row">
        <input id="hab1" placeholder="Habit 1" value="{{HAB1}}" />
        <span class="mark" id="res1">{{RES1}}</span>
        <button type="button" data-slot="1">Done</button>
      </div>
      <div class="slot-row">
        <input id="hab2" placeholder="Habit 2" value="{{HAB2}}" />
        <span class="mark" id="res2">{{RES2}}</span>
        <button type="button" data-slot="2">Done</button>
      </div>
      <div class="slot-row">
        <input id="hab3" placeholder="Habit 3" value="{{HAB3}}" />
        <span class="mark" id="res3">{{RES3}}</span>
        <button type="button" data-slot="3">Done</button>
      </div>
      <div class="slot-row">
        <input id="hab4" placeholder="Habit 4" value="{{HAB4}}" />
        <span class="mark" id="res4">{{RES4}}</span>
        <button type="button" data-slot="4">Done</button>
      </div>
      <div class="toolbar">
        <button class="primary" id="save">Save session</button>
        <button id="fun">{{FUN_LABEL}}</button>
        <a href="/stats">Dashboard</a>
      </div>
      <div class="status" id="status"></div>
    </section>

    <section class="card">
      <div class="toolbar">
        <h2 style="margin: 0; flex: 1;">History</h2>
        <a href="/api/export" download>Export</a>
        <input id="import" type="file" accept="application/json" hidden />
        <button id="import-btn">Import</button>
        <button id="undo">Undo clear</button>
        <button class="danger" id="clear">Clear</button>
      </div>
      <div id="history">{{HISTORY}}</div>
    </section>
  </main>

  <script>
    const statusEl = document.getElementById('status');
    const historyEl = document.getElementById('history');

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const request = async (url, options) => {
      const res = await fetch(url, options);
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }
      return res;
    };

    const renderHistory = (entries) => {
      historyEl.innerHTML = '';
      if (!entries.length) {
        const p = document.createElement('p');
        p.className = 'empty';
        p.textContent = 'No sessions logged yet.';
        historyEl.appendChild(p);
        return;
      }
      entries.forEach((entry) => {
        const group = document.createElement('div');
        group.className = 'session';
        ['hab1', 'hab2', 'hab3', 'hab4'].forEach((key) => {
          const value = (entry[key] || '').trim();
          if (!value) return;
          const p = document.createElement('p');
          p.textContent = '✔️ ' + value;
          group.appendChild(p);
        });
        const small = document.createElement('small');
        small.textContent = entry.date || '';
        group.appendChild(small);
        historyEl.appendChild(group);
      });
    };

    const refreshHistory = async () => {
      const res = await request('/api/history');
      renderHistory(await res.json());
    };

    document.getElementById('save').addEventListener('click', async () => {
      try {
        const body = {};
        ['hab1', 'hab2', 'hab3', 'hab4'].forEach((key) => {
          body[key] = document.getElementById(key).value;
        });
        await request('/api/save', {
          method: 'POST',
          headers: { 'content-type': 'application/json' },
          body: JSON.stringify(body)
        });
        ['hab1', 'hab2', 'hab3', 'hab4'].forEach((key) => {
          document.getElementById(key).value = '';
        });
        document.getElementById('hab1').focus();
        await refreshHistory();
        setStatus('Session saved', 'ok');
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    document.querySelectorAll('button[data-slot]').forEach((button) => {
      button.addEventListener('click', async () => {
        try {
          const slot = Number(button.dataset.slot);
          await request('/api/check', {
            method: 'POST',
            headers: { 'content-type': 'application/json' },
            body: JSON.stringify({ slot })
          });
          document.getElementById('res' + slot).textContent = '✔️';
        } catch (err) {
          setStatus(err.message, 'error');
        }
      });
    });

    document.getElementById('clear').addEventListener('click', async () => {
      if (!confirm('Clear the whole history?')) return;
      try {
        await request('/api/clear', { method: 'POST' });
        [1, 2, 3, 4].forEach((n) => {
          document.getElementById('res' + n).textContent = '';
        });
        await refreshHistory();
        setStatus('History cleared', 'ok');
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    document.getElementById('undo').addEventListener('click', async () => {
      try {
        const res = await request('/api/undo', { method: 'POST' });
        renderHistory(await res.json());
        setStatus('History restored', 'ok');
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    const importInput = document.getElementById('import');
    document.getElementById('import-btn').addEventListener('click', () => importInput.click());
    importInput.addEventListener('change', async (event) => {
      const file = event.target.files && event.target.files[0];
      if (!file) return;
      try {
        const text = await file.text();
        await request('/api/import', {
          method: 'POST',
          headers: { 'content-type': 'application/json' },
          body: text
        });
        await refreshHistory();
        setStatus('Import finished', 'ok');
      } catch (err) {
        setStatus(err.message, 'error');
      }
      event.target.value = '';
    });

    document.getElementById('fun').addEventListener('click', async () => {
      try {
        const res = await request('/api/fun', { method: 'POST' });
        const data = await res.json();
        document.body.classList.toggle('fun', data.fun_mode);
        document.getElementById('fun').textContent = data.fun_mode ? 'Normal mode' : 'Fun mode';
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });
  </script>
</body>
</html>
"#;

const STATS_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Habit Tracker - Dashboard</title>
  <style>
    :root {
      --bg: #eef2f7;
      --ink: #23313f;
      --accent: #3b7dd8;
      --card: #ffffff;
    }

    * { box-sizing: border-box; }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(160deg, var(--bg), #dde7f3);
      color: var(--ink);
      font-family: "Segoe UI", "Helvetica Neue", sans-serif;
      display: flex;
      justify-content: center;
      padding: 28px 16px 44px;
    }

    .page { width: min(760px, 100%); display: grid; gap: 20px; }

    .card {
      background: var(--card);
      border-radius: 14px;
      padding: 22px;
      box-shadow: 0 10px 30px rgba(35, 49, 63, 0.12);
    }

    h1 { margin: 0; font-size: 1.6rem; }
    h2 { margin: 0 0 12px; font-size: 1.2rem; }

    .back { font-weight: 600; color: var(--accent); text-decoration: none; }

    .cards {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(150px, 1fr));
      gap: 14px;
    }

    .metric {
      background: var(--card);
      border-radius: 14px;
      padding: 18px;
      box-shadow: 0 10px 30px rgba(35, 49, 63, 0.12);
    }

    .metric .label {
      display: block;
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: #76839a;
    }

    .metric .value {
      display: block;
      font-size: 1.7rem;
      font-weight: 600;
      color: var(--accent);
    }

    .freq-row { display: grid; grid-template-columns: 80px 1fr 40px; gap: 10px; align-items: center; margin-bottom: 8px; }
    .freq-bar { background: #e3eaf2; border-radius: 6px; height: 14px; overflow: hidden; }
    .freq-fill { background: var(--accent); height: 100%; }

    #trend { width: 100%; height: 240px; display: block; }
    .chart-line { fill: none; stroke: var(--accent); stroke-width: 3; }
    .chart-point { fill: white; stroke: var(--accent); stroke-width: 2; }
    .chart-grid { stroke: rgba(35, 49, 63, 0.12); }
    .chart-label { fill: #76839a; font-size: 11px; }

    .empty { color: #76839a; }
  </style>
</head>
<body>
  <main class="page">
    <section class="card" style="display: flex; justify-content: space-between; align-items: center;">
      <h1>Dashboard</h1>
      <a class="back" href="/">Back to tracker</a>
    </section>

    <section class="cards">
      <div class="metric"><span class="label">Entries</span><span class="value" id="total">0</span></div>
      <div class="metric"><span class="label">Complete sessions</span><span class="value" id="complete">0</span></div>
      <div class="metric"><span class="label">Success rate</span><span class="value" id="rate">0%</span></div>
      <div class="metric"><span class="label">Streak</span><span class="value" id="streak">0 days</span></div>
    </section>

    <section class="card">
      <h2>Habit frequency</h2>
      <div id="frequency"></div>
    </section>

    <section class="card">
      <h2>Last 7 days</h2>
      <svg id="trend" viewBox="0 0 600 240" role="img" aria-label="Entries per day"></svg>
    </section>
  </main>

  <script>
    const renderFrequency = (frequency) => {
      const container = document.getElementById('frequency');
      container.innerHTML = '';
      const labels = Object.keys(frequency);
      if (!labels.length) {
        const p = document.createElement('p');
        p.className = 'empty';
        p.textContent = 'Nothing logged yet.';
        container.appendChild(p);
        return;
      }
      const max = Math.max(...Object.values(frequency));
      labels.forEach((label) => {
        const row = document.createElement('div');
        row.className = 'freq-row';
        const name = document.createElement('span');
        name.textContent = label;
        const bar = document.createElement('div');
        bar.className = 'freq-bar';
        const fill = document.createElement('div');
        fill.className = 'freq-fill';
        fill.style.width = Math.round((frequency[label] / max) * 100) + '%';
        bar.appendChild(fill);
        const count = document.createElement('span');
        count.textContent = frequency[label];
        row.appendChild(name);
        row.appendChild(bar);
        row.appendChild(count);
        container.appendChild(row);
      });
    };

    const renderTrend = (points) => {
      const chart = document.getElementById('trend');
      const width = 600;
      const height = 240;
      const paddingX = 40;
      const paddingY = 30;
      const top = 20;

      const max = Math.max(1, ...points.map((p) => p.count));
      const xStep = (width - paddingX * 2) / (points.length - 1);
      const x = (index) => paddingX + index * xStep;
      const y = (value) => height - paddingY - (value / max) * (height - top - paddingY);

      const path = points
        .map((point, index) => (index === 0 ? 'M' : 'L') + ' ' + x(index).toFixed(1) + ' ' + y(point.count).toFixed(1))
        .join(' ');

      let grid = '';
      for (let i = 0; i <= max; i += Math.max(1, Math.ceil(max / 4))) {
        const yPos = y(i);
        grid += '<line class="chart-grid" x1="' + paddingX + '" y1="' + yPos + '" x2="' + (width - paddingX) + '" y2="' + yPos + '" />';
        grid += '<text class="chart-label" x="' + (paddingX - 8) + '" y="' + (yPos + 4) + '" text-anchor="end">' + i + '</text>';
      }

      const labels = points
        .map((point, index) =>
          '<text class="chart-label" x="' + x(index) + '" y="' + (height - paddingY + 16) + '" text-anchor="middle">' + point.date.slice(5) + '</text>')
        .join('');

      const circles = points
        .map((point, index) => '<circle class="chart-point" cx="' + x(index) + '" cy="' + y(point.count) + '" r="4" />')
        .join('');

      chart.innerHTML = grid + '<path class="chart-line" d="' + path + '" />' + circles + labels;
    };

    const load = async () => {
      const res = await fetch('/api/stats');
      if (!res.ok) return;
      const stats = await res.json();
      document.getElementById('total').textContent = stats.total_entries;
      document.getElementById('complete').textContent = stats.complete_sessions;
      document.getElementById('rate').textContent = stats.success_rate + '%';
      document.getElementById('streak').textContent = stats.current_streak + ' days';
      renderFrequency(stats.habit_frequency);
      renderTrend(stats.trend_last_7_days);
    };

    load();
  </script>
</body>
</html>
"#;
