//! Carte Leaflet : configuration injectée + script statique

use std::fmt::Write;

use anyhow::Result;
use serde::Serialize;
use serde_json::value::RawValue;
use swath::GeoFeature;

use crate::config::MapConfig;
use crate::export::collection_to_string;
use crate::view::DashboardView;

const MAP_SCRIPT: &str = include_str!("map.js");

/// Rend la `<div>` de la carte et ses scripts
pub fn render_map(view: &DashboardView, map: &MapConfig) -> Result<String> {
    let config = map_config(view, map)?;

    let mut html = String::new();
    write!(
        html,
        r#"<div id="map" style="height:{}px;width:100%"></div>"#,
        map.height_px
    )?;
    write!(
        html,
        "<script>const MAP_CONFIG = {};\n{}</script>",
        script_safe(&config),
        MAP_SCRIPT
    )?;
    Ok(html)
}

/// Couche d'un satellite telle que lue par `map.js`
#[derive(Serialize)]
struct MapLayer {
    name: &'static str,
    color: &'static str,
    data: Box<RawValue>,
}

/// Objet JSON consommé par `map.js`
///
/// Les FeatureCollection sont écrites par le writer geozero et embarquées telles quelles.
#[derive(Serialize)]
struct MapSettings {
    center: [f64; 2],
    zoom: u8,
    basemap: &'static str,
    aoi: Option<Box<RawValue>>,
    /// `[[sud, ouest], [nord, est]]`
    bounds: Option<[[f64; 2]; 2]>,
    layers: Vec<MapLayer>,
}

fn raw_collection<'a>(
    features: impl IntoIterator<Item = &'a GeoFeature>,
) -> Result<Box<RawValue>> {
    Ok(RawValue::from_string(collection_to_string(features)?)?)
}

pub fn map_config(view: &DashboardView, map: &MapConfig) -> Result<String> {
    let aoi = view.active_aoi();

    let layers = view
        .drawn_layers()
        .map(|layer| {
            Ok(MapLayer {
                name: layer.satellite.id(),
                color: layer.satellite.color(),
                data: raw_collection(view.layer_features(layer))?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let settings = MapSettings {
        center: map.center,
        zoom: map.zoom,
        basemap: view.request.basemap.label(),
        aoi: aoi.map(|a| raw_collection(&a.features)).transpose()?,
        bounds: aoi
            .and_then(|a| a.bounds())
            .map(|b| [[b.min().y, b.min().x], [b.max().y, b.max().x]]),
        layers,
    };

    Ok(serde_json::to_string(&settings)?)
}

/// Empêche la fermeture prématurée du `<script>` hôte
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}
