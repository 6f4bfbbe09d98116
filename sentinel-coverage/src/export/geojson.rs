//! Export vers GeoJSON avec geozero (streaming)

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use geozero::geojson::GeoJsonWriter;
use geozero::GeozeroGeometry;

use swath::GeoFeature;

/// Exporte des features en GeoJSON (EPSG:4326, pas de membre `crs`)
pub fn export_to_geojson<'a>(
    features: impl IntoIterator<Item = &'a GeoFeature>,
    output_path: &Path,
) -> Result<usize> {
    let file = File::create(output_path)
        .context(format!("Failed to create file: {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);

    let written = write_collection(&mut writer, features)?;
    writer.flush()?;

    Ok(written)
}

/// FeatureCollection en mémoire, pour l'injection dans la page
pub fn collection_to_string<'a>(
    features: impl IntoIterator<Item = &'a GeoFeature>,
) -> Result<String> {
    let mut buffer = Vec::new();
    write_collection(&mut buffer, features)?;
    String::from_utf8(buffer).context("GeoJSON output is not UTF-8")
}

/// Écrit une FeatureCollection ; les features sans géométrie sont ignorées
pub fn write_collection<'a, W: Write>(
    writer: &mut W,
    features: impl IntoIterator<Item = &'a GeoFeature>,
) -> Result<usize> {
    write!(writer, r#"{{"type":"FeatureCollection","features":["#)?;

    let mut written = 0;
    for feature in features {
        if feature.geometry.is_none() {
            continue;
        }
        if written > 0 {
            write!(writer, ",")?;
        }
        write_feature(writer, feature)?;
        written += 1;
    }

    write!(writer, "]}}")?;
    Ok(written)
}

fn write_feature<W: Write>(writer: &mut W, feature: &GeoFeature) -> Result<()> {
    let Some(geometry) = &feature.geometry else {
        return Ok(());
    };

    write!(writer, r#"{{"type":"Feature","id":{},"#, feature.index)?;

    write!(writer, r#""geometry":"#)?;
    let mut geom_buf = Vec::new();
    let mut geom_writer = GeoJsonWriter::new(&mut geom_buf);
    geometry.process_geom(&mut geom_writer)?;
    writer.write_all(&geom_buf)?;

    write!(writer, r#","properties":"#)?;
    match &feature.properties {
        Some(properties) => serde_json::to_writer(&mut *writer, properties)?,
        None => write!(writer, "{{}}")?,
    }
    write!(writer, "}}")?;

    Ok(())
}
