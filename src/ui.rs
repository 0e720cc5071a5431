use crate::models::AggregateStats;

pub fn render_index(stats: &AggregateStats) -> String {
    let rows = if stats.per_category.is_empty() {
        String::from(r#"<tr><td colspan="3" class="empty">No data yet</td></tr>"#)
    } else {
        stats
            .per_category
            .iter()
            .map(|row| {
                format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                    escape(&row.category),
                    row.needed,
                    row.donated
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    INDEX_HTML
        .replace("{{ROWS}}", &rows)
        .replace("{{MOST_NEEDED}}", &leader_label(stats.most_needed.as_deref()))
        .replace("{{MOST_DONATED}}", &leader_label(stats.most_donated.as_deref()))
}

fn leader_label(category: Option<&str>) -> String {
    category.map(escape).unwrap_or_else(|| "n/a".to_string())
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>BloodPulse</title>
  <style>
    body { font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 40rem; color: #2b2a28; }
    h1 { color: #b3141c; }
    table { width: 100%; border-collapse: collapse; }
    th, td { padding: 0.5rem; border-bottom: 1px solid #e6d8d8; text-align: left; }
    .empty { text-align: center; color: #8a8080; }
    .leaders span { font-weight: 600; }
  </style>
</head>
<body>
  <h1>BloodPulse</h1>
  <p class="leaders">
    Most needed: <span id="most-needed">{{MOST_NEEDED}}</span> ·
    Most donated: <span id="most-donated">{{MOST_DONATED}}</span>
  </p>
  <table>
    <thead><tr><th>Blood type</th><th>Needed</th><th>Donated</th></tr></thead>
    <tbody>
{{ROWS}}
    </tbody>
  </table>
</body>
</html>
"#;
