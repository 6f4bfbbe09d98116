//! Rendu HTML du tableau de bord (page unique, rendu serveur)

pub mod map;

use std::borrow::Cow;
use std::fmt::Write;
use std::path::Path;

use anyhow::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use swath::dates::format_date;
use tracing::debug;

use crate::config::{Config, LogoConfig};
use crate::report::format_percent;
use crate::view::{Basemap, DashboardView, Notice, NoticeLevel};

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

const STYLE: &str = r#"
body { margin: 0; font-family: sans-serif; color: #262730; }
header { display: flex; align-items: center; gap: 1.5rem; padding: 1rem 2rem; }
header h1 { margin: 0; }
.layout { display: flex; }
aside { width: 300px; min-width: 300px; padding: 1rem 1.5rem; background: #f0f2f6; }
aside h2 { font-size: 1.15rem; margin: 1.2rem 0 0.5rem; }
aside label { display: block; margin: 0.5rem 0 0.2rem; font-size: 0.9rem; }
main { flex: 1; padding: 1rem 2rem; }
.notice { padding: 0.6rem 0.8rem; margin: 0.5rem 0; border-radius: 0.4rem; font-size: 0.9rem; }
.notice.info { background: #e3effc; color: #0b4a8b; }
.notice.warning { background: #fffbe5; color: #8a6d00; }
.notice.error { background: #ffecec; color: #a11; }
.refs { list-style: none; padding: 0; font-size: 0.9rem; }
.swatch { display: inline-block; width: 0.8rem; height: 0.8rem; margin-right: 0.4rem; }
.coverage { font-size: 1.1rem; }
"#;

const UPLOAD_SCRIPT: &str = r#"
document.querySelectorAll('input[data-upload]').forEach((input) => {
  input.addEventListener('change', async () => {
    const file = input.files[0];
    if (!file) return;
    const resp = await fetch(input.dataset.upload, { method: 'POST', body: file });
    if (resp.ok) {
      window.location.reload();
    } else {
      alert('Upload failed: ' + resp.status + ' ' + (await resp.text()));
    }
  });
});
"#;

/// Échappe une chaîne pour le HTML (texte et attributs)
pub fn escape_html(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Rend la page complète
pub fn render_page(config: &Config, view: &DashboardView) -> Result<String> {
    let mut html = String::with_capacity(16 * 1024);

    write!(
        html,
        r#"<!DOCTYPE html><html lang="en"><head><meta charset="utf-8"><title>{title}</title><link rel="stylesheet" href="{LEAFLET_CSS}"><script src="{LEAFLET_JS}"></script><style>{STYLE}</style></head><body>"#,
        title = escape_html(&config.title)
    )?;

    render_header(&mut html, config)?;

    html.push_str(r#"<div class="layout"><aside>"#);
    render_sidebar(&mut html, config, view)?;
    html.push_str("</aside><main>");
    render_main(&mut html, config, view)?;
    html.push_str("</main></div>");

    write!(html, "<script>{UPLOAD_SCRIPT}</script></body></html>")?;
    Ok(html)
}

fn render_header(html: &mut String, config: &Config) -> Result<()> {
    html.push_str("<header>");
    if let Some(logo) = &config.logo {
        if let Some(img) = logo_data_uri(&config.data_dir, logo) {
            write!(
                html,
                r#"<a href="{}" target="_blank" rel="noopener"><img src="{img}" style="height:60px;display:block" alt="logo"></a>"#,
                escape_html(&logo.link)
            )?;
        }
    }
    write!(html, "<h1>{}</h1></header>", escape_html(&config.title))?;
    Ok(())
}

/// Logo encodé en data URI ; absent si le fichier n'existe pas
fn logo_data_uri(data_dir: &Path, logo: &LogoConfig) -> Option<String> {
    let path = data_dir.join(&logo.path);
    match std::fs::read(&path) {
        Ok(bytes) => Some(format!("data:image/png;base64,{}", STANDARD.encode(bytes))),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Logo not available");
            None
        }
    }
}

fn render_notice(html: &mut String, notice: &Notice) -> Result<()> {
    let class = match notice.level {
        NoticeLevel::Info => "info",
        NoticeLevel::Warning => "warning",
        NoticeLevel::Error => "error",
    };
    write!(
        html,
        r#"<div class="notice {class}">{}</div>"#,
        escape_html(&notice.message)
    )?;
    Ok(())
}

fn render_sidebar(html: &mut String, config: &Config, view: &DashboardView) -> Result<()> {
    let request = &view.request;

    html.push_str(r#"<form method="get" action="/">"#);

    // AOI
    html.push_str(r#"<h2>Area of Interest (AOI)</h2><label for="aoi">Select AOI</label>"#);
    html.push_str(r#"<select id="aoi" name="aoi" onchange="this.form.submit()">"#);
    write!(
        html,
        r#"<option value=""{}>(None)</option>"#,
        if request.aoi.is_none() { " selected" } else { "" }
    )?;
    for aoi in &config.aois {
        let selected = request.aoi.as_deref() == Some(aoi.key.as_str());
        write!(
            html,
            r#"<option value="{}"{}>{}</option>"#,
            escape_html(&aoi.key),
            if selected { " selected" } else { "" },
            escape_html(&aoi.name)
        )?;
    }
    html.push_str("</select>");

    if let Some(status) = view.aoi_status.as_ref().filter(|s| s.upload_prompt) {
        write!(
            html,
            r#"<label>Upload {} (GeoJSON)</label><input type="file" accept=".geojson,.json" data-upload="/upload/aoi/{}">"#,
            escape_html(&status.name),
            escape_html(&status.key)
        )?;
    }

    // Plans
    for status in view.plan_status.iter().filter(|s| s.upload_prompt) {
        write!(
            html,
            r#"<label>Upload {} plan ({})</label><input type="file" accept=".geojson,.json" data-upload="/upload/plan/{}">"#,
            status.satellite,
            escape_html(&status.file),
            status.satellite
        )?;
    }

    for notice in &view.sidebar {
        render_notice(html, notice)?;
    }

    // Date
    write!(
        html,
        r#"<h2>Pick a date</h2><label for="date">Date</label><input type="date" id="date" name="date" value="{}" onchange="this.form.submit()">"#,
        format_date(request.date)
    )?;

    if view.is_ready() {
        html.push_str(r#"<ul class="refs">"#);
        for layer in &view.layers {
            let reference = layer
                .reference_date
                .map(format_date)
                .unwrap_or_else(|| "none".to_string());
            write!(
                html,
                r#"<li><span class="swatch" style="background:{}"></span>{}: {} ({} swaths)</li>"#,
                layer.satellite.color(),
                layer.satellite,
                reference,
                layer.feature_indices.len()
            )?;
        }
        html.push_str("</ul>");
    }

    // Fond de carte
    html.push_str("<h2>Basemap</h2><label>Choose basemap</label>");
    for basemap in Basemap::ALL {
        write!(
            html,
            r#"<label><input type="radio" name="basemap" value="{}"{} onchange="this.form.submit()"> {}</label>"#,
            basemap.key(),
            if basemap == request.basemap { " checked" } else { "" },
            basemap.label()
        )?;
    }

    html.push_str("<noscript><button type=\"submit\">Apply</button></noscript></form>");
    Ok(())
}

fn render_main(html: &mut String, config: &Config, view: &DashboardView) -> Result<()> {
    for notice in &view.main {
        render_notice(html, notice)?;
    }
    if !view.is_ready() {
        return Ok(());
    }

    html.push_str(&map::render_map(view, &config.map)?);

    if let Some(percent) = view.coverage_percent {
        write!(
            html,
            r#"<p class="coverage"><strong>{}</strong></p>"#,
            format_percent(percent)
        )?;
    }
    Ok(())
}
