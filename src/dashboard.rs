//! Server-rendered pages: the input form and the results dashboard.

use crate::models::{ExposureLevel, FootprintData};
use crate::radar::{self, HIGH_ACCENT, LOW_ACCENT, MEDIUM_ACCENT};
use crate::session::AnalysisSession;
use crate::validation::{MIN_CHAR_COUNT, SOFT_MAX_CHAR_COUNT};
use regex::Regex;
use std::fmt::Write;
use std::sync::OnceLock;

/// Escapes text for use in HTML/SVG content and attribute values.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Colors and wording for an exposure level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExposureTheme {
    pub accent: &'static str,
    pub label: &'static str,
    pub css_class: &'static str,
}

pub fn exposure_theme(level: ExposureLevel) -> ExposureTheme {
    match level {
        ExposureLevel::High => ExposureTheme {
            accent: HIGH_ACCENT,
            label: "High Exposure",
            css_class: "exposure-high",
        },
        ExposureLevel::Medium => ExposureTheme {
            accent: MEDIUM_ACCENT,
            label: "Moderate Exposure",
            css_class: "exposure-medium",
        },
        ExposureLevel::Low => ExposureTheme {
            accent: LOW_ACCENT,
            label: "Low Exposure",
            css_class: "exposure-low",
        },
    }
}

/// Coarse platform family for a detected source, used to badge it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    LinkedIn,
    GitHub,
    Twitter,
    Web,
    Other,
}

impl SourceKind {
    pub fn badge(&self) -> &'static str {
        match self {
            SourceKind::LinkedIn => "in",
            SourceKind::GitHub => "gh",
            SourceKind::Twitter => "x",
            SourceKind::Web => "www",
            SourceKind::Other => "doc",
        }
    }
}

fn source_patterns() -> &'static [(SourceKind, Regex)] {
    static PATTERNS: OnceLock<Vec<(SourceKind, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (SourceKind::LinkedIn, r"(?i)linkedin"),
            (SourceKind::GitHub, r"(?i)github"),
            (SourceKind::Twitter, r"(?i)twitter|(^|\s)x(\s|/|$)"),
            (SourceKind::Web, r"(?i)portfolio|blog|website"),
        ]
        .into_iter()
        .map(|(kind, pattern)| (kind, Regex::new(pattern).unwrap()))
        .collect()
    })
}

/// First matching family wins, in the order LinkedIn, GitHub, Twitter, Web.
pub fn classify_source(source: &str) -> SourceKind {
    source_patterns()
        .iter()
        .find(|(_, re)| re.is_match(source))
        .map(|(kind, _)| *kind)
        .unwrap_or(SourceKind::Other)
}

const STYLE: &str = r#"
body { margin: 0; background: #0f172a; color: #e2e8f0; font-family: system-ui, sans-serif; }
main { max-width: 72rem; margin: 0 auto; padding: 2rem 1rem; }
h1 span { color: #38bdf8; }
.card { background: rgba(30, 41, 59, 0.6); border: 1px solid rgba(255, 255, 255, 0.05); border-radius: 1.5rem; padding: 1.5rem; margin-bottom: 1.5rem; }
textarea { width: 100%; height: 12rem; background: #0b1220; color: #f1f5f9; border: 1px solid #334155; border-radius: 1rem; padding: 1rem; box-sizing: border-box; }
textarea.warn { border-color: rgba(245, 158, 11, 0.5); }
textarea.err { border-color: rgba(239, 68, 68, 0.5); }
button { width: 100%; padding: 1rem; border: 0; border-radius: 1rem; background: #0ea5e9; color: #fff; font-weight: 900; text-transform: uppercase; letter-spacing: 0.1em; }
button:disabled { opacity: 0.4; cursor: not-allowed; }
.warning { color: #f59e0b; font-size: 0.8rem; }
.error { color: #f87171; background: rgba(239, 68, 68, 0.1); border-radius: 0.75rem; padding: 1rem; }
.chip { display: inline-block; padding: 0.3rem 0.8rem; margin: 0.2rem; border-radius: 1rem; background: #1e293b; font-size: 0.8rem; }
.badge { font-family: monospace; opacity: 0.7; margin-right: 0.4rem; }
.exposure-high { color: #f87171; } .exposure-medium { color: #fbbf24; } .exposure-low { color: #34d399; }
.counter { font-family: monospace; font-size: 0.7rem; color: #64748b; } .counter.short { color: #f59e0b; }
button.secondary { width: auto; margin-top: 0.5rem; padding: 0.4rem 1rem; background: transparent; color: #64748b; font-size: 0.7rem; }
.chart { width: 100%; }
"#;

const SCRIPT: &str = r#"
document.querySelectorAll('form[data-analyze]').forEach(function (form) {
  var text = form.querySelector('textarea[name=text]');
  var button = form.querySelector('button[data-visualize]');
  var clear = form.querySelector('button[name=clear]');
  var counter = form.querySelector('.counter');
  var width = form.querySelector('input[name=width]');
  var min = parseInt(form.dataset.min, 10);
  var softMax = parseInt(form.dataset.softMax, 10);
  var busy = false;
  var warning = form.querySelector('.warning');
  if (!warning) {
    warning = document.createElement('p');
    warning.className = 'warning';
    warning.hidden = true;
    form.insertBefore(warning, button);
  }
  function gate() {
    if (busy) { return; }
    var count = Array.from(text.value).length;
    var blank = text.value.trim().length === 0;
    var short = count > 0 && count < min;
    var message = '';
    if (short) {
      message = 'Input is too short (' + count + '/' + min + ' chars). Analysis works best with full bios or multiple posts.';
    } else if (count >= softMax) {
      message = 'Input is very long. Results may be truncated for the summary.';
    }
    counter.textContent = count + ' CHRS';
    counter.className = short ? 'counter short' : 'counter';
    warning.textContent = message;
    warning.hidden = message === '';
    if (text.className !== 'err') { text.className = message ? 'warn' : ''; }
    button.disabled = blank || short;
  }
  text.addEventListener('input', gate);
  if (clear) {
    clear.addEventListener('click', function (event) {
      event.preventDefault();
      text.value = '';
      text.className = '';
      gate();
      text.focus();
    });
  }
  if (width) { width.value = form.offsetWidth; }
  form.addEventListener('submit', function (event) {
    if (event.submitter && event.submitter.name === 'clear') { return; }
    busy = true;
    button.disabled = true;
    button.textContent = 'Processing...';
  });
  gate();
});
document.querySelectorAll('[data-chart]').forEach(function (chart) {
  var drawn = 0;
  var timer = null;
  function redraw() {
    var width = chart.offsetWidth;
    if (!chart.dataset.metrics || width === drawn) { return; }
    drawn = width;
    fetch('/api/v1/chart', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({
        metrics: JSON.parse(chart.dataset.metrics),
        accentColor: chart.dataset.accent,
        containerWidth: width
      })
    }).then(function (response) {
      return response.ok ? response.text() : null;
    }).then(function (svg) {
      if (svg !== null) { chart.innerHTML = svg; }
    });
  }
  window.addEventListener('resize', function () {
    clearTimeout(timer);
    timer = setTimeout(redraw, 100);
  });
  redraw();
});
"#;

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n\
         <main>\n<header><h1>Footprint<span>Lens</span></h1><p>Privacy Awareness Tool</p></header>\n\
         {}\n</main>\n<footer><p>This application does not store user data. All processing is transient.</p></footer>\n\
         <script>{}</script>\n</body>\n</html>\n",
        escape_html(title),
        STYLE,
        body,
        SCRIPT
    )
}

/// Picks the page for the session: results when there is one, else the form.
pub fn render_session(session: &AnalysisSession, container_width: Option<u32>) -> String {
    match session.result() {
        Some(data) => render_results_page(data, container_width),
        None => render_input_page(session),
    }
}

/// The input form, reflecting validation, error and in-flight state.
pub fn render_input_page(session: &AnalysisSession) -> String {
    let check = session.validation();
    let warning = check.warning;
    let mut body = String::new();

    let textarea_class = if session.error().is_some() {
        "err"
    } else if warning.is_some() {
        "warn"
    } else {
        ""
    };
    let counter_class = if check.char_count > 0 && check.char_count < MIN_CHAR_COUNT {
        "counter short"
    } else {
        "counter"
    };

    let _ = write!(
        body,
        "<section class=\"card\">\n<h2>Expose your digital trail.</h2>\n\
         <p>Paste a bio or summary. <a href=\"/?sample=1\">Sample</a></p>\n\
         <form method=\"post\" action=\"/analyze\" data-analyze data-min=\"{}\" data-soft-max=\"{}\">\n\
         <textarea name=\"text\" class=\"{}\" placeholder=\"Example: 'Cloud Architect at TechCorp...'\">{}</textarea>\n\
         <input type=\"hidden\" name=\"width\" value=\"\">\n\
         <div class=\"{}\">{} CHRS</div>\n",
        MIN_CHAR_COUNT,
        SOFT_MAX_CHAR_COUNT,
        textarea_class,
        escape_html(session.input()),
        counter_class,
        check.char_count
    );

    if let Some(w) = warning {
        let _ = write!(body, "<p class=\"warning\">{}</p>\n", escape_html(&w.message()));
    }

    let (disabled, label) = if session.is_in_flight() {
        (" disabled", "Processing...")
    } else if session.can_analyze() {
        ("", "Visualize")
    } else {
        (" disabled", "Visualize")
    };
    let _ = write!(
        body,
        "<button type=\"submit\" data-visualize{}>{}</button>\n\
         <button type=\"submit\" name=\"clear\" value=\"1\" class=\"secondary\">Clear</button>\n</form>\n",
        disabled, label
    );

    if let Some(err) = session.error() {
        let _ = write!(
            body,
            "<div class=\"error\"><strong>Error</strong><p>{}</p></div>\n",
            escape_html(err)
        );
    }
    body.push_str("</section>");

    page("FootprintLens", &body)
}

fn list_items(out: &mut String, items: &[String]) {
    out.push_str("<ul>");
    for item in items {
        let _ = write!(out, "<li>{}</li>", escape_html(item));
    }
    out.push_str("</ul>");
}

/// The results dashboard with the radar chart embedded inline.
pub fn render_results_page(data: &FootprintData, container_width: Option<u32>) -> String {
    let theme = exposure_theme(data.exposure_level);
    let size = container_width
        .map(radar::canvas_size)
        .unwrap_or(radar::DEFAULT_CANVAS_SIZE);
    let chart = radar::render(&data.metrics, theme.accent, size);
    // Redrawn by the page script whenever the container is resized
    let metrics_json = serde_json::to_string(&data.metrics).unwrap_or_default();
    let mut body = String::new();

    let _ = write!(
        body,
        "<section class=\"card\">\n<h3>Presence Metrics</h3>\n\
         <div class=\"chart\" data-chart data-accent=\"{}\" data-metrics=\"{}\">{}</div>\n\
         <div><div>Exposure</div><div class=\"{}\">{}</div></div>\n\
         <div><div>Public ID</div><div>{}</div></div>\n</section>\n",
        theme.accent,
        escape_html(&metrics_json),
        chart,
        theme.css_class,
        data.exposure_level,
        escape_html(&data.identity.name)
    );

    body.push_str("<section class=\"card\">\n<h3>Likely Platforms</h3>\n<div>");
    for source in &data.detected_sources {
        let kind = classify_source(source);
        let _ = write!(
            body,
            "<span class=\"chip\"><span class=\"badge\">{}</span>{}</span>",
            kind.badge(),
            escape_html(source)
        );
    }
    body.push_str("</div>\n");

    let _ = write!(
        body,
        "<h3>Extracted Context</h3>\n<div>Core Profile</div>\n\
         <span class=\"chip\">{}</span><span class=\"chip\">{}</span>\n<div>Capabilities</div>\n<div>",
        escape_html(&data.identity.role),
        escape_html(&data.identity.location)
    );
    for capability in &data.capabilities {
        let _ = write!(body, "<span class=\"chip\">{}</span>", escape_html(capability));
    }
    body.push_str("</div>\n</section>\n");

    let _ = write!(
        body,
        "<section class=\"card\">\n<h3>Analysis Findings <span class=\"{}\">{}</span></h3>\n\
         <blockquote>&quot;{}&quot;</blockquote>\n<h4 class=\"{}\">Exposure Signals</h4>\n",
        theme.css_class,
        theme.label,
        escape_html(&data.risk_reasoning),
        theme.css_class
    );
    list_items(&mut body, &data.activity_signals);
    body.push_str("\n</section>\n");

    body.push_str("<section class=\"card\">\n<h3 class=\"exposure-low\">Improvements</h3>\n<ol>");
    for tip in &data.tips {
        let _ = write!(body, "<li>{}</li>", escape_html(tip));
    }
    body.push_str("</ol>\n</section>\n<p><a href=\"/\">Analyze New Data</a></p>");

    page("FootprintLens - Results", &body)
}
