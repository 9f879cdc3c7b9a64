//! Chart parts (`ppt/charts/chartN.xml`).
//!
//! Each chart object on a slide owns one DrawingML chart part. The slide only
//! carries a `p:graphicFrame` pointing at it; the series data lives in the
//! chart part as literal caches, so no embedded workbook is required.
//!
//! # Structure
//!
//! ```xml
//! <c:chartSpace>
//!   <c:chart>
//!     <c:title>...</c:title>            <!-- or autoTitleDeleted -->
//!     <c:plotArea>
//!       <c:barChart>...<c:axId val="1"/><c:axId val="2"/></c:barChart>
//!       <c:catAx><c:axId val="1"/>...</c:catAx>
//!       <c:valAx><c:axId val="2"/>...</c:valAx>
//!     </c:plotArea>
//!     <c:legend>...</c:legend>
//!   </c:chart>
//! </c:chartSpace>
//! ```
//!
//! Axis ids are fixed at 1 (category) and 2 (value) in every part; they only
//! need to be unique inside one chart part.

use serde::{Deserialize, Serialize};

use crate::constants::{CATEGORY_AXIS_ID, NS_CHART, NS_DRAWING, NS_RELATIONSHIPS, VALUE_AXIS_ID};
use crate::model::ChartObject;
use crate::xml::{escape_xml, solid_fill};

/// Default series palette (Office accent colors)
pub const DEFAULT_CHART_COLORS: [&str; 8] = [
    "4472C4", "ED7D31", "A5A5A5", "FFC000", "5B9BD5", "70AD47", "264478", "9E480E",
];

/// Line width for line-chart series, in EMU (2.25pt)
const LINE_SERIES_WIDTH: i64 = 28_575;

/// Supported chart kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartType {
    #[default]
    Bar,
    BarStacked,
    #[serde(rename = "bar3D")]
    Bar3D,
    Line,
    LineSmooth,
    Pie,
    #[serde(rename = "pie3D")]
    Pie3D,
    Doughnut,
    Area,
}

impl ChartType {
    /// Pie-like charts have no axes and plot only their first series
    pub fn is_pie_like(&self) -> bool {
        matches!(self, Self::Pie | Self::Pie3D | Self::Doughnut)
    }

    fn series_kind(&self) -> SeriesKind {
        match self {
            Self::Line => SeriesKind::Line,
            Self::LineSmooth => SeriesKind::SmoothLine,
            Self::Pie | Self::Pie3D | Self::Doughnut => SeriesKind::Pie,
            Self::Bar | Self::BarStacked | Self::Bar3D | Self::Area => SeriesKind::Plain,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeriesKind {
    Plain,
    Line,
    SmoothLine,
    Pie,
}

impl SeriesKind {
    fn is_line(self) -> bool {
        matches!(self, Self::Line | Self::SmoothLine)
    }
}

/// Legend placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LegendPosition {
    #[serde(rename = "l")]
    Left,
    #[default]
    #[serde(rename = "r")]
    Right,
    #[serde(rename = "t")]
    Top,
    #[serde(rename = "b")]
    Bottom,
}

impl LegendPosition {
    /// Value of `c:legendPos`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "l",
            Self::Right => "r",
            Self::Top => "t",
            Self::Bottom => "b",
        }
    }
}

/// One data series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSeries {
    /// Series name shown in the legend
    pub name: String,

    /// Category labels
    pub labels: Vec<String>,

    /// Numeric values, one per label
    pub values: Vec<f64>,

    /// Fill color; empty uses the palette
    pub color: String,
}

impl ChartSeries {
    /// Create a named series from labels and values
    pub fn new<L, S>(name: impl Into<String>, labels: L, values: Vec<f64>) -> Self
    where
        L: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            labels: labels.into_iter().map(Into::into).collect(),
            values,
            color: String::new(),
        }
    }

    /// Set an explicit series color
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

/// Chart placement and appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,

    pub title: String,
    pub show_title: bool,
    pub show_legend: bool,
    pub legend_position: LegendPosition,

    /// Data labels with values
    pub show_values: bool,

    pub show_category_axis: bool,
    pub show_value_axis: bool,

    /// Gap between bar clusters, percent of bar width
    pub bar_gap_width: u32,

    /// Doughnut hole, percent of diameter
    pub hole_size: u32,

    /// Palette used for series (or pie slices) without their own color
    pub colors: Vec<String>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            x: 1.0,
            y: 1.5,
            width: 8.0,
            height: 4.0,
            title: String::new(),
            show_title: true,
            show_legend: true,
            legend_position: LegendPosition::Right,
            show_values: false,
            show_category_axis: true,
            show_value_axis: true,
            bar_gap_width: 150,
            hole_size: 50,
            colors: DEFAULT_CHART_COLORS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl ChartOptions {
    /// Fill zeroed fields with their defaults
    pub(crate) fn apply_defaults(&mut self) {
        if self.width == 0.0 {
            self.width = 8.0;
        }
        if self.height == 0.0 {
            self.height = 4.0;
        }
        if self.colors.is_empty() {
            self.colors = DEFAULT_CHART_COLORS.iter().map(|c| c.to_string()).collect();
        }
        if self.bar_gap_width == 0 {
            self.bar_gap_width = 150;
        }
        if self.hole_size == 0 {
            self.hole_size = 50;
        }
        self.hole_size = self.hole_size.min(90);
    }

    fn palette_color(&self, idx: usize) -> Option<&str> {
        if self.colors.is_empty() {
            None
        } else {
            Some(self.colors[idx % self.colors.len()].as_str())
        }
    }
}

/// Render the complete chart part for a chart object
pub fn chart_part_xml(chart: &ChartObject) -> String {
    let opts = &chart.options;
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<c:chartSpace xmlns:c="{}" xmlns:a="{}" xmlns:r="{}">
<c:date1904 val="0"/><c:lang val="en-US"/><c:roundedCorners val="0"/>
<c:chart>"#,
        NS_CHART, NS_DRAWING, NS_RELATIONSHIPS
    );

    if opts.show_title && !opts.title.is_empty() {
        xml.push_str(&format!(
            r#"<c:title><c:tx><c:rich><a:bodyPr/><a:lstStyle/><a:p><a:pPr><a:defRPr sz="1400" b="0"/></a:pPr><a:r><a:rPr lang="en-US" sz="1400" b="1"/><a:t>{}</a:t></a:r></a:p></c:rich></c:tx><c:overlay val="0"/></c:title>"#,
            escape_xml(&opts.title)
        ));
    } else {
        xml.push_str(r#"<c:autoTitleDeleted val="1"/>"#);
    }

    if chart.chart_type == ChartType::Pie3D {
        xml.push_str(r#"<c:view3D><c:rotX val="30"/><c:rotY val="0"/><c:rAngAx val="0"/></c:view3D>"#);
    }

    xml.push_str("\n<c:plotArea><c:layout/>");
    xml.push_str(&plot_xml(chart));
    if !chart.chart_type.is_pie_like() {
        xml.push_str(&axes_xml(opts));
    }
    xml.push_str("</c:plotArea>\n");

    if opts.show_legend {
        xml.push_str(&format!(
            r#"<c:legend><c:legendPos val="{}"/><c:overlay val="0"/></c:legend>"#,
            opts.legend_position.as_str()
        ));
    }

    xml.push_str(
        r#"<c:plotVisOnly val="1"/><c:dispBlanksAs val="gap"/>
</c:chart>
<c:printSettings><c:headerFooter/><c:pageMargins b="0.75" l="0.7" r="0.7" t="0.75" header="0.3" footer="0.3"/><c:pageSetup/></c:printSettings>
</c:chartSpace>"#,
    );
    xml
}

/// Inner chart element for the chart kind
fn plot_xml(chart: &ChartObject) -> String {
    let opts = &chart.options;
    let kind = chart.chart_type.series_kind();
    let axis_ids = format!(
        r#"<c:axId val="{}"/><c:axId val="{}"/>"#,
        CATEGORY_AXIS_ID, VALUE_AXIS_ID
    );

    match chart.chart_type {
        ChartType::Bar | ChartType::BarStacked | ChartType::Bar3D => {
            let stacked = chart.chart_type == ChartType::BarStacked;
            let mut xml = format!(
                r#"<c:barChart><c:barDir val="col"/><c:grouping val="{}"/><c:varyColors val="0"/>"#,
                if stacked { "stacked" } else { "clustered" }
            );
            for (i, series) in chart.series.iter().enumerate() {
                xml.push_str(&series_xml(i, series, kind, opts));
            }
            if opts.show_values {
                xml.push_str(&data_labels(true, false, false, false));
            }
            xml.push_str(&format!(r#"<c:gapWidth val="{}"/>"#, opts.bar_gap_width));
            if stacked {
                xml.push_str(r#"<c:overlap val="100"/>"#);
            }
            xml.push_str(&axis_ids);
            xml.push_str("</c:barChart>");
            xml
        }
        ChartType::Line | ChartType::LineSmooth => {
            let mut xml =
                String::from(r#"<c:lineChart><c:grouping val="standard"/><c:varyColors val="0"/>"#);
            for (i, series) in chart.series.iter().enumerate() {
                xml.push_str(&series_xml(i, series, kind, opts));
            }
            if opts.show_values {
                xml.push_str(&data_labels(true, false, false, false));
            }
            let smooth = u8::from(chart.chart_type == ChartType::LineSmooth);
            xml.push_str(&format!(
                r#"<c:marker val="1"/><c:smooth val="{}"/>"#,
                smooth
            ));
            xml.push_str(&axis_ids);
            xml.push_str("</c:lineChart>");
            xml
        }
        ChartType::Pie | ChartType::Pie3D => {
            let tag = if chart.chart_type == ChartType::Pie3D {
                "c:pie3DChart"
            } else {
                "c:pieChart"
            };
            let mut xml = format!(r#"<{}><c:varyColors val="1"/>"#, tag);
            if let Some(first) = chart.series.first() {
                xml.push_str(&series_xml(0, first, kind, opts));
            }
            xml.push_str(&data_labels(opts.show_values, true, true, true));
            if chart.chart_type == ChartType::Pie {
                xml.push_str(r#"<c:firstSliceAng val="0"/>"#);
            }
            xml.push_str(&format!("</{}>", tag));
            xml
        }
        ChartType::Doughnut => {
            let mut xml = String::from(r#"<c:doughnutChart><c:varyColors val="1"/>"#);
            if let Some(first) = chart.series.first() {
                xml.push_str(&series_xml(0, first, kind, opts));
            }
            xml.push_str(&data_labels(opts.show_values, true, true, false));
            xml.push_str(&format!(
                r#"<c:firstSliceAng val="0"/><c:holeSize val="{}"/></c:doughnutChart>"#,
                opts.hole_size
            ));
            xml
        }
        ChartType::Area => {
            let mut xml =
                String::from(r#"<c:areaChart><c:grouping val="standard"/><c:varyColors val="0"/>"#);
            for (i, series) in chart.series.iter().enumerate() {
                xml.push_str(&series_xml(i, series, kind, opts));
            }
            if opts.show_values {
                xml.push_str(&data_labels(true, false, false, false));
            }
            xml.push_str(&axis_ids);
            xml.push_str("</c:areaChart>");
            xml
        }
    }
}

fn data_labels(value: bool, category: bool, percent: bool, leader_lines: bool) -> String {
    let mut xml = format!(
        r#"<c:dLbls><c:showLegendKey val="0"/><c:showVal val="{}"/><c:showCatName val="{}"/><c:showSerName val="0"/><c:showPercent val="{}"/><c:showBubbleSize val="0"/>"#,
        u8::from(value),
        u8::from(category),
        u8::from(percent)
    );
    if leader_lines {
        xml.push_str(r#"<c:showLeaderLines val="1"/>"#);
    }
    xml.push_str("</c:dLbls>");
    xml
}

/// Spreadsheet column letter for a 0-based series position
fn column_letter(idx: usize) -> String {
    let mut n = idx + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.iter().rev().map(|&b| b as char).collect()
}

fn series_xml(idx: usize, series: &ChartSeries, kind: SeriesKind, opts: &ChartOptions) -> String {
    let mut xml = format!(
        r#"<c:ser><c:idx val="{0}"/><c:order val="{0}"/>"#,
        idx
    );

    if !series.name.is_empty() {
        xml.push_str(&format!(
            "<c:tx><c:v>{}</c:v></c:tx>",
            escape_xml(&series.name)
        ));
    }

    let color = if series.color.is_empty() {
        opts.palette_color(idx)
    } else {
        Some(series.color.as_str())
    };

    if let Some(color) = color {
        xml.push_str("<c:spPr>");
        xml.push_str(&solid_fill(color));
        if kind.is_line() {
            xml.push_str(&format!(
                r#"<a:ln w="{}">{}</a:ln>"#,
                LINE_SERIES_WIDTH,
                solid_fill(color)
            ));
        }
        xml.push_str("</c:spPr>");
    }

    if kind.is_line() {
        xml.push_str(r#"<c:marker><c:symbol val="circle"/><c:size val="5"/>"#);
        if let Some(color) = color {
            xml.push_str(&format!("<c:spPr>{}</c:spPr>", solid_fill(color)));
        }
        xml.push_str("</c:marker>");
    }

    if kind == SeriesKind::Pie {
        for i in 0..series.values.len() {
            if let Some(slice_color) = opts.palette_color(i) {
                xml.push_str(&format!(
                    r#"<c:dPt><c:idx val="{}"/><c:bubble3D val="0"/><c:spPr>{}</c:spPr></c:dPt>"#,
                    i,
                    solid_fill(slice_color)
                ));
            }
        }
    }

    let column = column_letter(idx + 1);

    xml.push_str(&format!(
        r#"<c:cat><c:strRef><c:f>Sheet1!$A$2:$A${}</c:f><c:strCache><c:ptCount val="{}"/>"#,
        series.labels.len() + 1,
        series.labels.len()
    ));
    for (i, label) in series.labels.iter().enumerate() {
        xml.push_str(&format!(
            r#"<c:pt idx="{}"><c:v>{}</c:v></c:pt>"#,
            i,
            escape_xml(label)
        ));
    }
    xml.push_str("</c:strCache></c:strRef></c:cat>");

    xml.push_str(&format!(
        r#"<c:val><c:numRef><c:f>Sheet1!${col}$2:${col}${}</c:f><c:numCache><c:formatCode>General</c:formatCode><c:ptCount val="{}"/>"#,
        series.values.len() + 1,
        series.values.len(),
        col = column
    ));
    for (i, value) in series.values.iter().enumerate() {
        if value.is_finite() {
            xml.push_str(&format!(
                r#"<c:pt idx="{}"><c:v>{}</c:v></c:pt>"#,
                i, value
            ));
        }
    }
    xml.push_str("</c:numCache></c:numRef></c:val>");

    if kind.is_line() {
        xml.push_str(&format!(
            r#"<c:smooth val="{}"/>"#,
            u8::from(kind == SeriesKind::SmoothLine)
        ));
    }

    xml.push_str("</c:ser>");
    xml
}

/// Category and value axes shared by bar, line and area charts
fn axes_xml(opts: &ChartOptions) -> String {
    format!(
        r#"<c:catAx><c:axId val="{cat}"/><c:scaling><c:orientation val="minMax"/></c:scaling><c:delete val="{cat_del}"/><c:axPos val="b"/><c:numFmt formatCode="General" sourceLinked="0"/><c:majorTickMark val="out"/><c:minorTickMark val="none"/><c:tickLblPos val="nextTo"/><c:crossAx val="{val}"/><c:crosses val="autoZero"/><c:auto val="1"/><c:lblAlgn val="ctr"/><c:lblOffset val="100"/><c:noMultiLvlLbl val="0"/></c:catAx><c:valAx><c:axId val="{val}"/><c:scaling><c:orientation val="minMax"/></c:scaling><c:delete val="{val_del}"/><c:axPos val="l"/><c:majorGridlines/><c:numFmt formatCode="General" sourceLinked="0"/><c:majorTickMark val="out"/><c:minorTickMark val="none"/><c:tickLblPos val="nextTo"/><c:crossAx val="{cat}"/><c:crosses val="autoZero"/><c:crossBetween val="between"/></c:valAx>"#,
        cat = CATEGORY_AXIS_ID,
        val = VALUE_AXIS_ID,
        cat_del = u8::from(!opts.show_category_axis),
        val_del = u8::from(!opts.show_value_axis),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(chart_type: ChartType, series: Vec<ChartSeries>) -> ChartObject {
        let mut options = ChartOptions::default();
        options.apply_defaults();
        ChartObject {
            chart_type,
            series,
            options,
            index: 1,
            rel_id: "rId201".to_string(),
        }
    }

    fn sample_series() -> Vec<ChartSeries> {
        vec![
            ChartSeries::new("S", ["A", "B"], vec![10.0, 20.0]),
            ChartSeries::new("T", ["A", "B"], vec![1.5, 2.5]).with_color("#F00"),
        ]
    }

    #[test]
    fn test_bar_chart_caches_and_axes() {
        let xml = chart_part_xml(&chart(ChartType::Bar, sample_series()));
        assert!(xml.contains(r#"<c:barDir val="col"/>"#));
        assert!(xml.contains(r#"<c:grouping val="clustered"/>"#));
        assert!(xml.contains(r#"<c:ptCount val="2"/>"#));
        assert!(xml.contains("<c:v>10</c:v>"));
        assert!(xml.contains("<c:v>20</c:v>"));
        assert!(xml.contains("<c:v>A</c:v>"));
        assert!(xml.contains("<c:v>B</c:v>"));
        assert!(xml.contains(r#"<c:catAx><c:axId val="1"/>"#));
        assert!(xml.contains(r#"<c:valAx><c:axId val="2"/>"#));
        assert!(xml.contains(r#"<c:gapWidth val="150"/>"#));
        assert_eq!(xml.matches("<c:ser>").count(), 2);
    }

    #[test]
    fn test_series_colors() {
        let xml = chart_part_xml(&chart(ChartType::Bar, sample_series()));
        // First series takes the palette, second its own color
        assert!(xml.contains(r#"<a:srgbClr val="4472C4"/>"#));
        assert!(xml.contains(r#"<a:srgbClr val="FF0000"/>"#));
    }

    #[test]
    fn test_stacked_bar() {
        let xml = chart_part_xml(&chart(ChartType::BarStacked, sample_series()));
        assert!(xml.contains(r#"<c:grouping val="stacked"/>"#));
        assert!(xml.contains(r#"<c:overlap val="100"/>"#));
    }

    #[test]
    fn test_line_chart_markers() {
        let xml = chart_part_xml(&chart(ChartType::LineSmooth, sample_series()));
        assert!(xml.contains("<c:lineChart>"));
        assert!(xml.contains(r#"<a:ln w="28575">"#));
        assert!(xml.contains(r#"<c:symbol val="circle"/><c:size val="5"/>"#));
        assert!(xml.contains(r#"<c:marker val="1"/><c:smooth val="1"/>"#));
        // Each series carries its own smoothing, which wins over the chart level
        let series = &xml[xml.find("<c:ser>").unwrap()..xml.find("</c:ser>").unwrap()];
        assert!(series.contains(r#"<c:smooth val="1"/>"#));
        assert!(!xml.contains(r#"<c:smooth val="0"/>"#));

        let plain = chart_part_xml(&chart(ChartType::Line, sample_series()));
        assert!(plain.contains(r#"<c:marker val="1"/><c:smooth val="0"/>"#));
        assert!(!plain.contains(r#"<c:smooth val="1"/>"#));
    }

    #[test]
    fn test_pie_uses_first_series_without_axes() {
        let xml = chart_part_xml(&chart(ChartType::Pie, sample_series()));
        assert!(xml.contains("<c:pieChart>"));
        assert!(xml.contains(r#"<c:varyColors val="1"/>"#));
        assert_eq!(xml.matches("<c:ser>").count(), 1);
        assert_eq!(xml.matches("<c:dPt>").count(), 2);
        assert!(xml.contains(r#"<c:showCatName val="1"/>"#));
        assert!(xml.contains(r#"<c:showPercent val="1"/>"#));
        assert!(xml.contains(r#"<c:showVal val="0"/>"#));
        assert!(!xml.contains("<c:catAx>"));
        assert!(!xml.contains("<c:valAx>"));
    }

    #[test]
    fn test_pie_3d_has_view() {
        let xml = chart_part_xml(&chart(ChartType::Pie3D, sample_series()));
        assert!(xml.contains("<c:pie3DChart>"));
        assert!(xml.contains("<c:view3D>"));
    }

    #[test]
    fn test_doughnut_hole() {
        let mut c = chart(ChartType::Doughnut, sample_series());
        c.options.hole_size = 65;
        let xml = chart_part_xml(&c);
        assert!(xml.contains(r#"<c:firstSliceAng val="0"/><c:holeSize val="65"/>"#));
        assert!(!xml.contains("<c:catAx>"));
    }

    #[test]
    fn test_area_chart() {
        let xml = chart_part_xml(&chart(ChartType::Area, sample_series()));
        assert!(xml.contains(r#"<c:areaChart><c:grouping val="standard"/>"#));
        assert!(xml.contains(r#"<c:axId val="1"/><c:axId val="2"/></c:areaChart>"#));
    }

    #[test]
    fn test_title_and_legend() {
        let mut c = chart(ChartType::Bar, sample_series());
        c.options.title = "Sales & Costs".to_string();
        c.options.legend_position = LegendPosition::Bottom;
        let xml = chart_part_xml(&c);
        assert!(xml.contains("<a:t>Sales &amp; Costs</a:t>"));
        assert!(xml.contains(r#"<c:legendPos val="b"/>"#));

        c.options.show_title = false;
        c.options.show_legend = false;
        let xml = chart_part_xml(&c);
        assert!(xml.contains(r#"<c:autoTitleDeleted val="1"/>"#));
        assert!(!xml.contains("<c:legend>"));
        assert!(xml.contains(r#"<c:plotVisOnly val="1"/><c:dispBlanksAs val="gap"/>"#));
    }

    #[test]
    fn test_show_values_labels() {
        let mut c = chart(ChartType::Bar, sample_series());
        c.options.show_values = true;
        let xml = chart_part_xml(&c);
        assert!(xml.contains(r#"<c:dLbls><c:showLegendKey val="0"/><c:showVal val="1"/>"#));
    }

    #[test]
    fn test_hidden_axes() {
        let mut c = chart(ChartType::Line, sample_series());
        c.options.show_value_axis = false;
        let xml = chart_part_xml(&c);
        assert!(xml.contains(r#"<c:valAx><c:axId val="2"/><c:scaling><c:orientation val="minMax"/></c:scaling><c:delete val="1"/>"#));
    }

    #[test]
    fn test_apply_defaults() {
        let mut opts = ChartOptions {
            width: 0.0,
            height: 0.0,
            bar_gap_width: 0,
            hole_size: 0,
            colors: Vec::new(),
            ..Default::default()
        };
        opts.apply_defaults();
        assert_eq!(opts.width, 8.0);
        assert_eq!(opts.height, 4.0);
        assert_eq!(opts.bar_gap_width, 150);
        assert_eq!(opts.hole_size, 50);
        assert_eq!(opts.colors.len(), 8);
    }

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(1), "B");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
    }
}
