use serde::{Deserialize, Serialize};

use crate::core::geo::TileCoord;

/// Trait representing anything that can produce tile URLs for a given coordinate.
pub trait TileSource: Send + Sync {
    /// Build a URL for the requested `coord`.
    fn url(&self, coord: TileCoord) -> String;
}

/// Raster tile servers the layer knows how to address
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "template", rename_all = "snake_case")]
pub enum TileProvider {
    /// The public OpenStreetMap tile servers
    #[default]
    OpenStreetMap,
    /// MapQuest-hosted OpenStreetMap rendering
    MapQuestOsm,
    /// MapQuest aerial imagery
    MapQuestAerial,
    /// Any server addressed as `{z}/{x}/{y}`, with an optional `{s}` subdomain
    Custom(String),
}

const OSM_SUBDOMAINS: [&str; 3] = ["a", "b", "c"];

impl TileSource for TileProvider {
    fn url(&self, coord: TileCoord) -> String {
        // Servers count rows from the north edge
        let row = coord.server_row();
        match self {
            TileProvider::OpenStreetMap => {
                let sub = OSM_SUBDOMAINS[((coord.x + row) % 3) as usize];
                format!(
                    "https://{}.tile.openstreetmap.org/{}/{}/{}.png",
                    sub, coord.z, coord.x, row
                )
            }
            TileProvider::MapQuestOsm => format!(
                "http://otile1.mqcdn.com/tiles/1.0.0/osm/{}/{}/{}.jpg",
                coord.z, coord.x, row
            ),
            TileProvider::MapQuestAerial => format!(
                "http://otile1.mqcdn.com/tiles/1.0.0/sat/{}/{}/{}.jpg",
                coord.z, coord.x, row
            ),
            TileProvider::Custom(template) => {
                let sub = OSM_SUBDOMAINS[((coord.x + row) % 3) as usize];
                template
                    .replace("{s}", sub)
                    .replace("{z}", &coord.z.to_string())
                    .replace("{x}", &coord.x.to_string())
                    .replace("{y}", &row.to_string())
            }
        }
    }
}
