use serde::{Deserialize, Serialize};

/// Identifier of a source image in the flag library (the JSON file stem)
pub type ImageId = String;

/// 2D point in image pixel space (y grows downwards)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Closed outline of one connected patch of a color, as traced in the image
pub type Contour = Vec<Point2D>;

/// One dominant color of the image together with the outlines it covers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorRegion {
    /// sRGB color of the region
    pub color: [u8; 3],
    /// Number of pixels that were classified as this color
    #[serde(default)]
    pub pixel_count: u64,
    /// Depth assigned by the generator from the color topology
    pub depth: f64,
    /// Outlines of every patch of this color
    #[serde(default)]
    pub contours: Vec<Contour>,
}

impl ColorRegion {
    /// Contours that can enclose an area
    pub fn closed_contours(&self) -> impl Iterator<Item = &Contour> {
        self.contours.iter().filter(|c| c.len() >= 3)
    }
}

/// Geometry generated for one image: its size and color regions.
///
/// Regions are ordered by occurrence, most frequent color first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagDescription {
    pub image_id: ImageId,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub regions: Vec<ColorRegion>,
}

impl FlagDescription {
    /// Regions that carry at least one closed contour
    pub fn usable_regions(&self) -> impl Iterator<Item = &ColorRegion> {
        self.regions
            .iter()
            .filter(|r| r.closed_contours().next().is_some())
    }

    /// Length of the longer image side in pixels (never zero)
    pub fn extent(&self) -> u32 {
        self.width.max(self.height).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64, y: f64, s: f64) -> Contour {
        vec![
            Point2D::new(x, y),
            Point2D::new(x + s, y),
            Point2D::new(x + s, y + s),
            Point2D::new(x, y + s),
        ]
    }

    #[test]
    fn test_description_parses_minimal_json() {
        let json = r#"{
            "image_id": "tricolor",
            "width": 30,
            "height": 20,
            "regions": [
                { "color": [0, 85, 164], "depth": 0.1,
                  "contours": [[{"x":0,"y":0},{"x":10,"y":0},{"x":10,"y":20},{"x":0,"y":20}]] }
            ]
        }"#;
        let desc: FlagDescription = serde_json::from_str(json).unwrap();
        assert_eq!(desc.image_id, "tricolor");
        assert_eq!(desc.regions.len(), 1);
        assert_eq!(desc.regions[0].pixel_count, 0);
        assert_eq!(desc.regions[0].contours[0].len(), 4);
    }

    #[test]
    fn test_missing_regions_defaults_to_empty() {
        let json = r#"{ "image_id": "blank", "width": 4, "height": 4 }"#;
        let desc: FlagDescription = serde_json::from_str(json).unwrap();
        assert!(desc.regions.is_empty());
        assert_eq!(desc.usable_regions().count(), 0);
    }

    #[test]
    fn test_usable_regions_skip_open_contours() {
        let desc = FlagDescription {
            image_id: "x".into(),
            width: 10,
            height: 10,
            regions: vec![
                ColorRegion {
                    color: [255, 0, 0],
                    pixel_count: 10,
                    depth: 0.0,
                    contours: vec![vec![Point2D::new(0.0, 0.0), Point2D::new(1.0, 1.0)]],
                },
                ColorRegion {
                    color: [0, 255, 0],
                    pixel_count: 5,
                    depth: 0.1,
                    contours: vec![square(0.0, 0.0, 2.0)],
                },
            ],
        };
        let usable: Vec<_> = desc.usable_regions().collect();
        assert_eq!(usable.len(), 1);
        assert_eq!(usable[0].color, [0, 255, 0]);
    }

    #[test]
    fn test_extent_never_zero() {
        let desc = FlagDescription {
            image_id: "empty".into(),
            width: 0,
            height: 0,
            regions: vec![],
        };
        assert_eq!(desc.extent(), 1);
    }
}
