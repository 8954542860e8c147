//! Serializable layout results returned by the renderers alongside the drawn surface.

use serde::Serialize;
use sirenia_core::value::Scalar;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcLayout {
    pub index: usize,
    pub name: Scalar,
    pub value: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub pad_angle: f64,
    pub path: String,
    pub color: String,
    /// Sector centroid at the label radius.
    pub label_x: f64,
    pub label_y: f64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonutLayout {
    pub width: f64,
    pub height: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub label_radius: f64,
    pub total: f64,
    pub total_label: String,
    pub arcs: Vec<ArcLayout>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarMark {
    pub index: usize,
    pub category: Scalar,
    pub value: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarLayout {
    pub width: f64,
    pub height: f64,
    pub step: f64,
    pub bandwidth: f64,
    pub bars: Vec<BarMark>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointMark {
    pub index: usize,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesLayout {
    pub key: Scalar,
    pub color: String,
    /// Defined points in input order; gaps are where indices skip.
    pub points: Vec<PointMark>,
    pub path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineLayout {
    pub width: f64,
    pub height: f64,
    pub series: Vec<SeriesLayout>,
}
