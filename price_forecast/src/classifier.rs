//! Rule-based mock classification of product images
//!
//! Nothing here is learned. Colour and texture statistics of an RGB buffer
//! are matched against a fixed table of crop rules, and a weighted quality
//! score picks the grade. Plant health and confidence are drawn from the RNG
//! the caller passes in.

use crate::data::ProductId;
use crate::error::{ForecastError, Result};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use statrs::statistics::Statistics;
use std::fmt;
use std::ops::Range;

const HISTOGRAM_BINS: usize = 32;

/// Crops the classifier can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Crop {
    Tomatoes,
    Potatoes,
    Wheat,
    Corn,
    Soybeans,
    Rice,
    Apples,
    Oranges,
}

impl Crop {
    pub const ALL: [Crop; 8] = [
        Crop::Tomatoes,
        Crop::Potatoes,
        Crop::Wheat,
        Crop::Corn,
        Crop::Soybeans,
        Crop::Rice,
        Crop::Apples,
        Crop::Oranges,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Crop::Tomatoes => "Tomatoes",
            Crop::Potatoes => "Potatoes",
            Crop::Wheat => "Wheat",
            Crop::Corn => "Corn",
            Crop::Soybeans => "Soybeans",
            Crop::Rice => "Rice",
            Crop::Apples => "Apples",
            Crop::Oranges => "Oranges",
        }
    }

    /// Product whose prices belong to this crop
    pub fn product_id(&self) -> ProductId {
        ProductId::new(self.name())
    }
}

impl fmt::Display for Crop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum QualityGrade {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl QualityGrade {
    /// Grade for a quality score in `[0, 1]`
    pub fn from_score(score: f64) -> Self {
        if score > 0.8 {
            QualityGrade::Excellent
        } else if score > 0.6 {
            QualityGrade::Good
        } else if score > 0.4 {
            QualityGrade::Fair
        } else {
            QualityGrade::Poor
        }
    }

    /// Odds of each [`PlantHealth::ALL`] label, `None` when always healthy
    fn health_weights(&self) -> Option<[f64; 4]> {
        match self {
            QualityGrade::Excellent | QualityGrade::Good => None,
            QualityGrade::Fair => Some([0.6, 0.2, 0.1, 0.1]),
            QualityGrade::Poor => Some([0.3, 0.3, 0.2, 0.2]),
        }
    }

    /// Range the reported confidence is drawn from
    pub fn confidence_range(&self) -> Range<f64> {
        match self {
            QualityGrade::Excellent => 0.9..0.99,
            QualityGrade::Good => 0.8..0.9,
            QualityGrade::Fair => 0.7..0.8,
            QualityGrade::Poor => 0.6..0.7,
        }
    }
}

impl fmt::Display for QualityGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QualityGrade::Excellent => "Excellent",
            QualityGrade::Good => "Good",
            QualityGrade::Fair => "Fair",
            QualityGrade::Poor => "Poor",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PlantHealth {
    Healthy,
    LeafSpot,
    Blight,
    Rust,
}

impl PlantHealth {
    pub const ALL: [PlantHealth; 4] = [
        PlantHealth::Healthy,
        PlantHealth::LeafSpot,
        PlantHealth::Blight,
        PlantHealth::Rust,
    ];
}

impl fmt::Display for PlantHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlantHealth::Healthy => "Healthy",
            PlantHealth::LeafSpot => "Leaf Spot",
            PlantHealth::Blight => "Blight",
            PlantHealth::Rust => "Rust",
        };
        f.write_str(name)
    }
}

/// Share of each channel in the mean colour
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorRatios {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl ColorRatios {
    /// Smallest over largest ratio; 1 for a perfectly grey image
    pub fn balance(&self) -> f64 {
        let values = [self.red, self.green, self.blue];
        let max = Statistics::max(&values);
        if max <= 0.0 {
            return 0.0;
        }
        Statistics::min(&values) / max
    }
}

/// Gradient and histogram statistics of the grey image
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextureFeatures {
    pub mean_gradient: f64,
    pub std_gradient: f64,
    /// Shannon entropy of the grey histogram, in bits
    pub entropy: f64,
    pub smoothness: f64,
    pub uniformity: f64,
}

/// Colour and texture summary of an image
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImageFeatures {
    pub mean_color: [f64; 3],
    pub std_color: [f64; 3],
    pub brightness: f64,
    pub contrast: f64,
    pub ratios: ColorRatios,
    /// Most populated histogram bin of each channel
    pub histogram_peaks: [usize; 3],
    pub texture: TextureFeatures,
    /// Variance across the three mean channel values
    pub color_variance: f64,
    pub color_std: f64,
}

impl ImageFeatures {
    /// Extract features from a row-major RGB8 buffer
    pub fn from_rgb(width: usize, height: usize, pixels: &[u8]) -> Result<Self> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(3))
            .filter(|&n| n > 0)
            .ok_or_else(|| {
                ForecastError::DataError(format!("Invalid image size {}x{}", width, height))
            })?;
        if pixels.len() != expected {
            return Err(ForecastError::DataError(format!(
                "Expected {} bytes for a {}x{} RGB image, got {}",
                expected,
                width,
                height,
                pixels.len()
            )));
        }

        let mut channels: [Vec<f64>; 3] = Default::default();
        let mut histograms = [[0usize; HISTOGRAM_BINS]; 3];
        let mut gray = Vec::with_capacity(width * height);

        for pixel in pixels.chunks_exact(3) {
            for (channel, &value) in pixel.iter().enumerate() {
                channels[channel].push(f64::from(value));
                histograms[channel][usize::from(value) * HISTOGRAM_BINS / 256] += 1;
            }
            gray.push(pixel.iter().map(|&v| f64::from(v)).sum::<f64>() / 3.0);
        }

        let mean_color = [0usize, 1, 2].map(|c| Statistics::mean(&channels[c]));
        let std_color = [0usize, 1, 2].map(|c| Statistics::population_std_dev(&channels[c]));

        let total = mean_color.iter().sum::<f64>() + 1e-6;
        let ratios = ColorRatios {
            red: mean_color[0] / total,
            green: mean_color[1] / total,
            blue: mean_color[2] / total,
        };

        let color_variance = Statistics::population_variance(&mean_color);

        Ok(Self {
            mean_color,
            std_color,
            brightness: Statistics::mean(&mean_color),
            contrast: Statistics::mean(&std_color),
            ratios,
            histogram_peaks: histograms.map(|h| peak_bin(&h)),
            texture: texture_features(width, height, &gray),
            color_variance,
            color_std: color_variance.sqrt(),
        })
    }
}

fn peak_bin(histogram: &[usize]) -> usize {
    let mut best = 0;
    for (bin, &count) in histogram.iter().enumerate() {
        if count > histogram[best] {
            best = bin;
        }
    }
    best
}

/// Finite difference along one axis: central inside, one-sided at the edges
fn axis_gradient(value_at: impl Fn(usize) -> f64, len: usize, i: usize) -> f64 {
    if len < 2 {
        0.0
    } else if i == 0 {
        value_at(1) - value_at(0)
    } else if i == len - 1 {
        value_at(i) - value_at(i - 1)
    } else {
        (value_at(i + 1) - value_at(i - 1)) / 2.0
    }
}

fn texture_features(width: usize, height: usize, gray: &[f64]) -> TextureFeatures {
    let mut magnitudes = Vec::with_capacity(gray.len());
    for y in 0..height {
        for x in 0..width {
            let gx = axis_gradient(|k| gray[y * width + k], width, x);
            let gy = axis_gradient(|k| gray[k * width + x], height, y);
            magnitudes.push(gx.hypot(gy));
        }
    }

    // Grey histogram spans the observed range, widened for flat images.
    let (mut low, mut high) = (Statistics::min(gray), Statistics::max(gray));
    if high <= low {
        low -= 0.5;
        high += 0.5;
    }
    let mut histogram = [0usize; HISTOGRAM_BINS];
    for &value in gray {
        let bin = ((value - low) / (high - low) * HISTOGRAM_BINS as f64) as usize;
        histogram[bin.min(HISTOGRAM_BINS - 1)] += 1;
    }

    let total = gray.len() as f64;
    let shares: Vec<f64> = histogram
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| count as f64 / total)
        .collect();

    let gray_std = Statistics::population_std_dev(gray);

    TextureFeatures {
        mean_gradient: Statistics::mean(&magnitudes),
        std_gradient: Statistics::population_std_dev(&magnitudes),
        entropy: -shares.iter().map(|p| p * p.log2()).sum::<f64>(),
        smoothness: 1.0 - 1.0 / (1.0 + gray_std.powi(2)),
        uniformity: shares.iter().map(|p| p * p).sum(),
    }
}

type CropRule = fn(&ImageFeatures) -> bool;

/// Checked in order; the first match wins
const CROP_RULES: [(Crop, CropRule); 5] = [
    (Crop::Rice, looks_like_rice),
    (Crop::Corn, looks_like_corn),
    (Crop::Tomatoes, looks_like_tomatoes),
    (Crop::Potatoes, looks_like_potatoes),
    (Crop::Wheat, looks_like_wheat),
];

/// Light, uniform grains with little colour variation
fn looks_like_rice(f: &ImageFeatures) -> bool {
    f.brightness > 160.0
        && f.brightness < 220.0
        && f.color_variance < 100.0
        && f.color_std < 15.0
        && f.texture.uniformity > 0.2
        && f.texture.smoothness > 0.7
        && (f.ratios.red - f.ratios.green).abs() < 0.1
        && f.ratios.blue < 0.34
        && f.texture.entropy < 3.0
}

/// Yellow dominant, medium texture
fn looks_like_corn(f: &ImageFeatures) -> bool {
    f.ratios.red > 0.4
        && f.ratios.green > 0.35
        && f.ratios.blue < 0.25
        && f.histogram_peaks[0] > f.histogram_peaks[2]
        && f.texture.mean_gradient < 50.0
}

/// Red dominant, smooth skin
fn looks_like_tomatoes(f: &ImageFeatures) -> bool {
    f.ratios.red > 0.45
        && f.ratios.green < 0.35
        && f.ratios.blue < 0.3
        && f.histogram_peaks[0] > f.histogram_peaks[1]
        && f.texture.smoothness > 0.7
}

/// Brown or beige, rough surface
fn looks_like_potatoes(f: &ImageFeatures) -> bool {
    (f.ratios.red - f.ratios.green).abs() < 0.1
        && f.ratios.blue < 0.3
        && f.texture.mean_gradient > 30.0
}

/// Yellow or brown with a lot of detail
fn looks_like_wheat(f: &ImageFeatures) -> bool {
    f.ratios.red > 0.35 && f.ratios.green > 0.35 && f.ratios.blue < 0.3 && f.texture.entropy > 3.5
}

/// Crop named by the first matching rule
///
/// When no rule matches, a crop is picked with an RNG seeded from the
/// brightness, so the same image always gets the same answer.
pub fn classify_crop(features: &ImageFeatures) -> Crop {
    CROP_RULES
        .iter()
        .find(|(_, rule)| rule(features))
        .map(|(crop, _)| *crop)
        .unwrap_or_else(|| {
            let mut rng = StdRng::seed_from_u64((features.brightness * 1000.0) as u64);
            Crop::ALL[rng.gen_range(0..Crop::ALL.len())]
        })
}

/// Weighted score of brightness, contrast, colour balance, texture and
/// colour consistency
pub fn quality_score(features: &ImageFeatures) -> f64 {
    let texture = &features.texture;
    let texture_score = 0.3 * texture.uniformity
        + 0.3 * (1.0 - texture.mean_gradient / 100.0)
        + 0.4 * (1.0 - texture.entropy / 5.0);
    let color_consistency = 1.0 - features.color_variance / 1000.0;

    0.25 * (features.brightness / 255.0)
        + 0.15 * (features.contrast.min(100.0) / 100.0)
        + 0.2 * features.ratios.balance()
        + 0.25 * texture_score
        + 0.15 * color_consistency
}

/// Outcome of classifying one image
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    pub crop: Crop,
    pub quality: QualityGrade,
    pub health: PlantHealth,
    pub confidence: f64,
}

/// Grade, health and confidence for an image
pub fn assess_quality<R: Rng + ?Sized>(
    features: &ImageFeatures,
    rng: &mut R,
) -> Result<(QualityGrade, PlantHealth, f64)> {
    let grade = QualityGrade::from_score(quality_score(features));

    let health = match grade.health_weights() {
        None => PlantHealth::Healthy,
        Some(weights) => {
            let index = WeightedIndex::new(weights)
                .map_err(|e| ForecastError::DataError(e.to_string()))?;
            PlantHealth::ALL[index.sample(rng)]
        }
    };

    let confidence = rng.gen_range(grade.confidence_range());
    Ok((grade, health, confidence))
}

/// Classify an image from its features
pub fn classify<R: Rng + ?Sized>(features: &ImageFeatures, rng: &mut R) -> Result<Classification> {
    let crop = classify_crop(features);
    let (quality, health, confidence) = assess_quality(features, rng)?;

    Ok(Classification {
        crop,
        quality,
        health,
        confidence,
    })
}
