use crate::store::{Statistics, TrendDirection, WeightRow};

pub fn render_weight_page(rows: &[WeightRow], stats: &Statistics, chart_svg: &str) -> String {
    INDEX_HTML
        .replace("{{STATS}}", &render_stats(stats))
        .replace("{{ROWS}}", &render_rows(rows))
        .replace("{{CHART}}", chart_svg)
}

fn render_stats(stats: &Statistics) -> String {
    match stats {
        Statistics::Empty => stat_item("Average Weight", "", "0 kg"),
        Statistics::Summary {
            average,
            total_change,
            min,
            max,
            ..
        } => {
            let (class, sign) = if *total_change > 0.0 {
                ("trend-up", "+")
            } else {
                ("trend-down", "")
            };
            [
                stat_item("Average Weight", "", &format!("{average:.1} kg")),
                stat_item("Total Change", class, &format!("{sign}{total_change:.1} kg")),
                stat_item("Range", "", &format!("{min:.1} - {max:.1} kg")),
            ]
            .concat()
        }
    }
}

fn stat_item(label: &str, class: &str, value: &str) -> String {
    format!(
        r#"<div class="stat-item"><div class="stat-label">{label}</div><div class="stat-value {class}">{value}</div></div>"#
    )
}

fn render_rows(rows: &[WeightRow]) -> String {
    rows.iter()
        .map(|row| {
            let (icon, class) = match row.direction {
                TrendDirection::Up => ("↑", "trend-up"),
                TrendDirection::Down => ("↓", "trend-down"),
                TrendDirection::Flat => ("–", ""),
            };
            format!(
                r#"<tr><td>{date}</td><td class="weight-cell">{weight} kg <span class="weight-trend {class}">{icon} {delta:.1} kg</span></td><td><button class="delete-btn" data-index="{index}">Delete</button></td></tr>"#,
                date = row.display_date,
                weight = row.weight,
                delta = row.trend.abs(),
                index = row.index,
            )
        })
        .collect()
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Weight Tracker</title>
  <style>
    :root {
      --ink: #1f2333;
      --muted: #6b7280;
      --accent: #646cff;
      --accent-2: #535bf2;
      --card: #ffffff;
      --shadow: 0 18px 40px rgba(83, 91, 242, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(160deg, #f4f5ff, #eef0ff 60%, #fafaff);
      color: var(--ink);
      font-family: "Inter", "Segoe UI", sans-serif;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(920px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    .card {
      background: var(--card);
      border-radius: 18px;
      box-shadow: var(--shadow);
      padding: 24px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.8rem, 4vw, 2.4rem);
    }

    form {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
      align-items: end;
    }

    label {
      display: grid;
      gap: 6px;
      font-size: 0.9rem;
      color: var(--muted);
    }

    input {
      padding: 10px 12px;
      border-radius: 10px;
      border: 1px solid #d8dbf5;
      font-size: 1rem;
    }

    button {
      padding: 10px 18px;
      border: none;
      border-radius: 10px;
      background: var(--accent);
      color: #fff;
      font-weight: 600;
      cursor: pointer;
    }

    .stats {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 12px;
    }

    .stat-label {
      color: var(--muted);
      font-size: 0.85rem;
    }

    .stat-value {
      font-size: 1.4rem;
      font-weight: 600;
    }

    .trend-up {
      color: #e11d48;
    }

    .trend-down {
      color: #16a34a;
    }

    .chart {
      position: relative;
    }

    .chart svg {
      width: 100%;
      height: auto;
      display: block;
    }

    .tooltip {
      position: absolute;
      display: none;
      transform: translateX(-50%);
      background: var(--ink);
      color: #fff;
      padding: 6px 10px;
      border-radius: 8px;
      font-size: 0.85rem;
      pointer-events: none;
      white-space: nowrap;
    }

    table {
      width: 100%;
      border-collapse: collapse;
    }

    th,
    td {
      text-align: left;
      padding: 10px 8px;
      border-bottom: 1px solid #eef0fb;
    }

    th {
      cursor: pointer;
      color: var(--muted);
    }

    .weight-trend {
      margin-left: 8px;
      font-size: 0.85rem;
    }

    .delete-btn {
      background: #fee2e2;
      color: #b91c1c;
      padding: 6px 12px;
    }

    .notification {
      position: fixed;
      right: 20px;
      bottom: 20px;
      padding: 12px 20px;
      border-radius: 10px;
      color: #fff;
      box-shadow: var(--shadow);
    }

    .notification.success {
      background: #16a34a;
    }

    .notification.error {
      background: #e11d48;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Weight Tracker</h1>
    </header>

    <section class="card">
      <form id="weight-form">
        <label>Date <input type="date" id="date" required /></label>
        <label>Weight (kg) <input type="number" id="weight" step="0.1" min="0" required /></label>
        <button type="submit">Add entry</button>
      </form>
    </section>

    <section class="card stats">{{STATS}}</section>

    <section class="card chart" id="chart">
      {{CHART}}
      <div class="tooltip" id="tooltip"></div>
    </section>

    <section class="card">
      <table>
        <thead>
          <tr><th data-sort="date">Date</th><th data-sort="weight">Weight</th><th></th></tr>
        </thead>
        <tbody id="entries-list">{{ROWS}}</tbody>
      </table>
    </section>
  </main>

  <script>
    const form = document.getElementById('weight-form');
    const dateInput = document.getElementById('date');
    const weightInput = document.getElementById('weight');
    const chart = document.getElementById('chart');
    const tooltip = document.getElementById('tooltip');

    const today = () => new Date().toISOString().split('T')[0];
    dateInput.value = today();

    const notify = ({ kind, message, dismiss_after_ms }) => {
      const el = document.createElement('div');
      el.className = `notification ${kind}`;
      el.textContent = message;
      document.body.appendChild(el);
      setTimeout(() => el.remove(), dismiss_after_ms);
    };

    const send = async (url, options) => {
      const res = await fetch(url, options);
      const body = await res.json();
      notify(body.notification || body);
      if (res.ok) {
        window.location.reload();
      }
    };

    const chartSvg = () => chart.querySelector('svg');
    const chartWidth = () => Math.round(chartSvg().getBoundingClientRect().width);

    const redraw = async (x, y) => {
      const params = new URLSearchParams({ width: chartWidth() });
      if (x !== undefined) {
        params.set('x', x);
        params.set('y', y);
      }
      const res = await fetch(`/api/weights/chart.svg?${params}`);
      const svg = chartSvg();
      if (res.ok && svg) {
        svg.outerHTML = await res.text();
      }
    };

    chart.addEventListener('mousemove', async (event) => {
      const rect = chartSvg().getBoundingClientRect();
      const x = event.clientX - rect.left;
      const y = event.clientY - rect.top;
      const res = await fetch(`/api/weights/hover?x=${x}&y=${y}&width=${chartWidth()}`);
      const tip = res.ok ? await res.json() : null;
      if (tip) {
        tooltip.style.display = 'block';
        tooltip.style.left = `${tip.left + chartSvg().offsetLeft}px`;
        tooltip.style.top = `${tip.top + chartSvg().offsetTop}px`;
        tooltip.innerHTML = `<strong>${tip.date}</strong><br>${tip.weight}`;
      } else {
        tooltip.style.display = 'none';
      }
      redraw(x, y);
    });

    chart.addEventListener('mouseleave', () => {
      tooltip.style.display = 'none';
      redraw();
    });

    form.addEventListener('submit', (event) => {
      event.preventDefault();
      send('/api/weights', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({ date: dateInput.value, weight: weightInput.value })
      }).catch((err) => notify({ kind: 'error', message: err.message, dismiss_after_ms: 3000 }));
    });

    document.querySelectorAll('.delete-btn').forEach((button) => {
      button.addEventListener('click', () => {
        send(`/api/weights/${button.dataset.index}`, { method: 'DELETE' })
          .catch((err) => notify({ kind: 'error', message: err.message, dismiss_after_ms: 3000 }));
      });
    });

    document.querySelectorAll('th[data-sort]').forEach((header) => {
      header.addEventListener('click', async () => {
        const res = await fetch(`/api/weights?sort=${header.dataset.sort}`);
        const { entries } = await res.json();
        const rows = document.querySelectorAll('#entries-list tr');
        const byIndex = new Map([...rows].map((row) => [row.querySelector('.delete-btn').dataset.index, row]));
        const body = document.getElementById('entries-list');
        entries.forEach((entry) => body.appendChild(byIndex.get(String(entry.index))));
      });
    });

    window.addEventListener('resize', () => redraw());
    redraw();
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn empty_stats_show_zero_average() {
        let html = render_weight_page(&[], &Statistics::Empty, "<svg></svg>");
        assert!(html.contains(r#"<div class="stat-value ">0 kg</div>"#));
        assert!(html.contains("<svg></svg>"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn rows_show_trend_and_delete_index() {
        let row = WeightRow {
            index: 0,
            date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            display_date: "Oct 19, 2026".into(),
            weight: 71.5,
            trend: -0.5,
            direction: TrendDirection::Down,
        };
        let stats = Statistics::Summary {
            count: 2,
            average: 71.75,
            total_change: -0.5,
            min: 71.5,
            max: 72.0,
        };
        let html = render_weight_page(&[row], &stats, "");

        assert!(html.contains("71.5 kg <span class=\"weight-trend trend-down\">↓ 0.5 kg</span>"));
        assert!(html.contains(r#"data-index="0""#));
        assert!(html.contains("-0.5 kg"));
        assert!(html.contains("71.5 - 72.0 kg"));
    }
}
