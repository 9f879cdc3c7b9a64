//! Shape tree elements, one emitter per [`SlideObject`] variant.
//!
//! Every emitter takes the shape id assigned by the slide (2, 3, ... in
//! insertion order) and returns a self-contained element string.

use crate::color::normalize_color;
use crate::constants::{
    DEFAULT_TABLE_STYLE_ID, MEDIA_EXT_URI, NS_CHART, NS_P14, NS_RELATIONSHIPS, NS_TABLE,
};
use crate::model::{
    AudioObject, ChartObject, ImageObject, ShapeObject, SlideObject, TableCell, TableObject,
    TextObject, VideoObject,
};
use crate::units::{
    alpha_from_transparency, font_size_hpt, inch_to_emu, line_spacing_pct, pt_to_emu,
    rotation_units,
};

use super::{escape_xml, solid_fill, xfrm};

/// Default text box size, in inches
const TEXT_DEFAULT_SIZE: (f64, f64) = (4.0, 0.5);

/// Default shape size, in inches
const SHAPE_DEFAULT_SIZE: (f64, f64) = (2.0, 1.0);

/// Default picture size, in inches
const IMAGE_DEFAULT_SIZE: (f64, f64) = (4.0, 3.0);

/// Default table width and row height, in inches
const TABLE_DEFAULT_WIDTH: f64 = 8.0;
const TABLE_DEFAULT_ROW_HEIGHT: f64 = 0.4;

/// Upper bound of the `roundRect` adjust value
const MAX_ROUNDING_ADJ: i64 = 50_000;

fn or_default(value: f64, default: f64) -> f64 {
    if value == 0.0 {
        default
    } else {
        value
    }
}

/// Emit the element for any slide object
pub fn object_xml(object: &SlideObject, id: usize) -> String {
    match object {
        SlideObject::Text(text) => text_box_xml(text, id),
        SlideObject::Shape(shape) => shape_xml(shape, id),
        SlideObject::Table(table) => table_xml(table, id),
        SlideObject::Image(image) => image_xml(image, id),
        SlideObject::Chart(chart) => chart_frame_xml(chart, id),
        SlideObject::Video(video) => video_xml(video, id),
        SlideObject::Audio(audio) => audio_xml(audio, id),
    }
}

/// Run properties shared by text boxes and table cells
struct RunStyle<'a> {
    size: f64,
    bold: bool,
    italic: bool,
    underline: bool,
    spacing: f64,
    color: &'a str,
    font_face: &'a str,
}

impl RunStyle<'_> {
    fn to_xml(&self) -> String {
        let mut xml = String::from(r#"<a:rPr lang="en-US""#);
        if self.size > 0.0 {
            xml.push_str(&format!(r#" sz="{}""#, font_size_hpt(self.size)));
        }
        if self.bold {
            xml.push_str(r#" b="1""#);
        }
        if self.italic {
            xml.push_str(r#" i="1""#);
        }
        if self.underline {
            xml.push_str(r#" u="sng""#);
        }
        if self.spacing != 0.0 {
            xml.push_str(&format!(r#" spc="{}""#, (self.spacing * 100.0).round() as i64));
        }
        xml.push('>');
        if !self.color.is_empty() {
            xml.push_str(&solid_fill(self.color));
        }
        if !self.font_face.is_empty() {
            let face = escape_xml(self.font_face);
            xml.push_str(&format!(
                r#"<a:latin typeface="{0}"/><a:ea typeface="{0}"/>"#,
                face
            ));
        }
        xml.push_str("</a:rPr>");
        xml
    }
}

/// One paragraph per line; empty lines keep only the end marker
fn paragraphs(text: &str, ppr: &str, run: &RunStyle<'_>) -> String {
    let rpr = run.to_xml();
    let mut xml = String::new();
    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        xml.push_str("<a:p>");
        xml.push_str(ppr);
        if !line.is_empty() {
            xml.push_str(&format!(
                "<a:r>{}<a:t>{}</a:t></a:r>",
                rpr,
                escape_xml(line)
            ));
        }
        xml.push_str(r#"<a:endParaRPr lang="en-US"/></a:p>"#);
    }
    xml
}

/// `p:sp` text box
pub fn text_box_xml(text: &TextObject, id: usize) -> String {
    let o = &text.options;
    let geometry = xfrm(
        "a:xfrm",
        inch_to_emu(o.x),
        inch_to_emu(o.y),
        inch_to_emu(or_default(o.width, TEXT_DEFAULT_SIZE.0)),
        inch_to_emu(or_default(o.height, TEXT_DEFAULT_SIZE.1)),
        rotation_units(o.rotate),
    );
    let fill = if o.fill.is_empty() {
        "<a:noFill/>".to_string()
    } else {
        solid_fill(&o.fill)
    };

    let mut body_pr = String::from(r#"<a:bodyPr wrap="square" rtlCol="0""#);
    if o.margin > 0.0 {
        let inset = inch_to_emu(o.margin);
        body_pr.push_str(&format!(
            r#" lIns="{0}" tIns="{0}" rIns="{0}" bIns="{0}""#,
            inset
        ));
    }
    if let Some(valign) = o.valign {
        body_pr.push_str(&format!(r#" anchor="{}""#, valign.as_str()));
    }
    body_pr.push_str("/>");

    let mut ppr = String::new();
    if o.align.is_some() || o.line_spacing > 0.0 {
        ppr.push_str("<a:pPr");
        if let Some(align) = o.align {
            ppr.push_str(&format!(r#" algn="{}""#, align.as_str()));
        }
        if o.line_spacing > 0.0 {
            ppr.push_str(&format!(
                r#"><a:lnSpc><a:spcPct val="{}"/></a:lnSpc></a:pPr>"#,
                line_spacing_pct(o.line_spacing)
            ));
        } else {
            ppr.push_str("/>");
        }
    }

    let run = RunStyle {
        size: o.font_size,
        bold: o.bold,
        italic: o.italic,
        underline: o.underline,
        spacing: o.char_spacing,
        color: &o.font_color,
        font_face: &o.font_face,
    };

    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="TextBox {id}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr>{geometry}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>{fill}</p:spPr><p:txBody>{body_pr}<a:lstStyle/>{paras}</p:txBody></p:sp>"#,
        id = id,
        geometry = geometry,
        fill = fill,
        body_pr = body_pr,
        paras = paragraphs(&text.text, &ppr, &run),
    )
}

/// `p:sp` preset shape
pub fn shape_xml(shape: &ShapeObject, id: usize) -> String {
    let o = &shape.options;
    let geometry = xfrm(
        "a:xfrm",
        inch_to_emu(o.x),
        inch_to_emu(o.y),
        inch_to_emu(or_default(o.width, SHAPE_DEFAULT_SIZE.0)),
        inch_to_emu(or_default(o.height, SHAPE_DEFAULT_SIZE.1)),
        rotation_units(o.rotate),
    );

    let fill = if o.fill.is_empty() {
        "<a:noFill/>".to_string()
    } else if o.transparency > 0.0 {
        format!(
            r#"<a:solidFill><a:srgbClr val="{}"><a:alpha val="{}"/></a:srgbClr></a:solidFill>"#,
            normalize_color(&o.fill),
            alpha_from_transparency(o.transparency)
        )
    } else {
        solid_fill(&o.fill)
    };

    let mut line = String::new();
    if !o.line_color.is_empty() && o.line_width > 0.0 {
        if let Some(dash) = o.line_style.preset_dash() {
            line = format!(
                r#"<a:ln w="{}">{}<a:prstDash val="{}"/></a:ln>"#,
                pt_to_emu(o.line_width),
                solid_fill(&o.line_color),
                dash
            );
        }
    }

    let shadow = if o.shadow {
        r#"<a:effectLst><a:outerShdw blurRad="50800" dist="38100" dir="2700000" algn="tl" rotWithShape="0"><a:srgbClr val="000000"><a:alpha val="40000"/></a:srgbClr></a:outerShdw></a:effectLst>"#
    } else {
        ""
    };

    let body = match &shape.text {
        Some(text) => {
            let run = RunStyle {
                size: 18.0,
                bold: false,
                italic: false,
                underline: false,
                spacing: 0.0,
                color: "FFFFFF",
                font_face: "",
            };
            format!(
                r#"<p:txBody><a:bodyPr wrap="square" rtlCol="0" anchor="ctr"/><a:lstStyle/>{}</p:txBody>"#,
                paragraphs(text, r#"<a:pPr algn="ctr"/>"#, &run)
            )
        }
        None => String::new(),
    };

    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="Shape {id}"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr>{geometry}<a:prstGeom prst="{preset}"><a:avLst/></a:prstGeom>{fill}{line}{shadow}</p:spPr>{body}</p:sp>"#,
        id = id,
        geometry = geometry,
        preset = shape.shape_type.preset(),
        fill = fill,
        line = line,
        shadow = shadow,
        body = body,
    )
}

/// `p:graphicFrame` table; empty string when the table has no columns
pub fn table_xml(table: &TableObject, id: usize) -> String {
    let o = &table.options;
    let cols = table.column_count();
    if cols == 0 {
        return String::new();
    }

    let col_widths: Vec<i64> = if o.col_widths.len() >= cols {
        o.col_widths[..cols].iter().map(|w| inch_to_emu(*w)).collect()
    } else {
        let total = inch_to_emu(or_default(o.width, TABLE_DEFAULT_WIDTH));
        vec![total / cols as i64; cols]
    };
    let row_heights: Vec<i64> = (0..table.rows.len())
        .map(|i| {
            inch_to_emu(
                o.row_heights
                    .get(i)
                    .copied()
                    .filter(|h| *h > 0.0)
                    .unwrap_or(TABLE_DEFAULT_ROW_HEIGHT),
            )
        })
        .collect();

    let cx: i64 = col_widths.iter().sum();
    let cy: i64 = row_heights.iter().sum();

    let mut xml = format!(
        r#"<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="{id}" name="Table {id}"/><p:cNvGraphicFramePr><a:graphicFrameLocks noGrp="1"/></p:cNvGraphicFramePr><p:nvPr/></p:nvGraphicFramePr>{frame}<a:graphic><a:graphicData uri="{uri}"><a:tbl><a:tblPr firstRow="1" bandRow="1"><a:tableStyleId>{style}</a:tableStyleId></a:tblPr><a:tblGrid>"#,
        id = id,
        frame = xfrm("p:xfrm", inch_to_emu(o.x), inch_to_emu(o.y), cx, cy, 0),
        uri = NS_TABLE,
        style = DEFAULT_TABLE_STYLE_ID,
    );
    for width in &col_widths {
        xml.push_str(&format!(r#"<a:gridCol w="{}"/>"#, width));
    }
    xml.push_str("</a:tblGrid>");

    for (row_idx, row) in table.rows.iter().enumerate() {
        xml.push_str(&format!(r#"<a:tr h="{}">"#, row_heights[row_idx]));
        let mut used = 0;
        for cell in row {
            if used >= cols {
                break;
            }
            xml.push_str(&table_cell_xml(cell, table, row_idx));
            let span = cell.col_span.max(1) as usize;
            // Covered grid columns still need a cell each
            for _ in 1..span {
                xml.push_str(MERGED_CELL);
            }
            used += span;
        }
        // Pad ragged rows so every row covers the grid
        let empty = TableCell::default();
        while used < cols {
            xml.push_str(&table_cell_xml(&empty, table, row_idx));
            used += 1;
        }
        xml.push_str("</a:tr>");
    }

    xml.push_str("</a:tbl></a:graphicData></a:graphic></p:graphicFrame>");
    xml
}

const MERGED_CELL: &str = r#"<a:tc hMerge="1"><a:txBody><a:bodyPr/><a:lstStyle/><a:p><a:endParaRPr lang="en-US"/></a:p></a:txBody><a:tcPr/></a:tc>"#;

fn table_cell_xml(cell: &TableCell, table: &TableObject, row_idx: usize) -> String {
    let o = &table.options;

    let mut xml = String::from("<a:tc");
    if cell.col_span > 1 {
        xml.push_str(&format!(r#" gridSpan="{}""#, cell.col_span));
    }
    if cell.row_span > 1 {
        xml.push_str(&format!(r#" rowSpan="{}""#, cell.row_span));
    }
    xml.push('>');

    let ppr = match cell.align {
        Some(align) => format!(r#"<a:pPr algn="{}"/>"#, align.as_str()),
        None => String::new(),
    };
    let run = RunStyle {
        size: or_default(cell.font_size, o.font_size),
        bold: cell.bold || (row_idx == 0 && o.first_row_bold),
        italic: cell.italic,
        underline: false,
        spacing: 0.0,
        color: if cell.font_color.is_empty() {
            &o.font_color
        } else {
            &cell.font_color
        },
        font_face: if cell.font_face.is_empty() {
            &o.font_face
        } else {
            &cell.font_face
        },
    };
    xml.push_str(&format!(
        "<a:txBody><a:bodyPr/><a:lstStyle/>{}</a:txBody>",
        paragraphs(&cell.text, &ppr, &run)
    ));

    let anchor = cell.valign.map(|v| v.as_str()).unwrap_or("ctr");
    xml.push_str(&format!(r#"<a:tcPr anchor="{}">"#, anchor));

    let border = &o.border;
    if !border.color.is_empty() && border.width > 0.0 {
        if let Some(dash) = border.style.preset_dash() {
            let width = pt_to_emu(border.width);
            let fill = solid_fill(&border.color);
            for side in ["lnL", "lnR", "lnT", "lnB"] {
                xml.push_str(&format!(
                    r#"<a:{side} w="{width}" cap="flat" cmpd="sng" algn="ctr">{fill}<a:prstDash val="{dash}"/></a:{side}>"#,
                    side = side,
                    width = width,
                    fill = fill,
                    dash = dash
                ));
            }
        }
    }

    let fill = if !cell.fill.is_empty() {
        Some(cell.fill.as_str())
    } else if row_idx == 0 && !o.first_row_fill.is_empty() {
        Some(o.first_row_fill.as_str())
    } else if !o.fill.is_empty() {
        Some(o.fill.as_str())
    } else {
        None
    };
    if let Some(fill) = fill {
        xml.push_str(&solid_fill(fill));
    }

    xml.push_str("</a:tcPr></a:tc>");
    xml
}

/// `roundRect` adjust value for a rounding request
fn rounding_adj(rounding: f64, cx: i64, cy: i64) -> i64 {
    let adj = if rounding < 0.0 {
        (-rounding * 100_000.0).round() as i64
    } else {
        let min_side = cx.min(cy);
        if min_side > 0 {
            inch_to_emu(rounding) * 100_000 / min_side
        } else {
            0
        }
    };
    adj.clamp(0, MAX_ROUNDING_ADJ)
}

/// `p:pic` picture
pub fn image_xml(image: &ImageObject, id: usize) -> String {
    let o = &image.options;
    let cx = inch_to_emu(or_default(o.width, IMAGE_DEFAULT_SIZE.0));
    let cy = inch_to_emu(or_default(o.height, IMAGE_DEFAULT_SIZE.1));

    let descr = if o.alt_text.is_empty() {
        String::new()
    } else {
        format!(r#" descr="{}""#, escape_xml(&o.alt_text))
    };

    let geom = if o.rounding != 0.0 {
        format!(
            r#"<a:prstGeom prst="roundRect"><a:avLst><a:gd name="adj" fmla="val {}"/></a:avLst></a:prstGeom>"#,
            rounding_adj(o.rounding, cx, cy)
        )
    } else {
        r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#.to_string()
    };

    format!(
        r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="Picture {id}"{descr}/><p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="{rel}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr>{geometry}{geom}</p:spPr></p:pic>"#,
        id = id,
        descr = descr,
        rel = image.media.rel_id,
        geometry = xfrm(
            "a:xfrm",
            inch_to_emu(o.x),
            inch_to_emu(o.y),
            cx,
            cy,
            rotation_units(o.rotate)
        ),
        geom = geom,
    )
}

/// `p:graphicFrame` pointing at a chart part
pub fn chart_frame_xml(chart: &ChartObject, id: usize) -> String {
    let o = &chart.options;
    format!(
        r#"<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="{id}" name="Chart {index}"/><p:cNvGraphicFramePr><a:graphicFrameLocks noGrp="1"/></p:cNvGraphicFramePr><p:nvPr/></p:nvGraphicFramePr>{frame}<a:graphic><a:graphicData uri="{ns_chart}"><c:chart xmlns:c="{ns_chart}" xmlns:r="{ns_rel}" r:id="{rel}"/></a:graphicData></a:graphic></p:graphicFrame>"#,
        id = id,
        index = chart.index,
        frame = xfrm(
            "p:xfrm",
            inch_to_emu(o.x),
            inch_to_emu(o.y),
            inch_to_emu(o.width),
            inch_to_emu(o.height),
            0
        ),
        ns_chart = NS_CHART,
        ns_rel = NS_RELATIONSHIPS,
        rel = chart.rel_id,
    )
}

/// Non-visual properties shared by audio and video pictures
fn media_nv_pr(id: usize, name: &str, file_tag: &str, link_id: &str, embed_id: &str) -> String {
    format!(
        r#"<p:nvPicPr><p:cNvPr id="{id}" name="{name} {id}"><a:hlinkClick r:id="" action="ppaction://media"/></p:cNvPr><p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr><{tag} r:link="{link}"/><p:extLst><p:ext uri="{uri}"><p14:media xmlns:p14="{ns_p14}" r:embed="{embed}"/></p:ext></p:extLst></p:nvPr></p:nvPicPr>"#,
        id = id,
        name = name,
        tag = file_tag,
        link = link_id,
        uri = MEDIA_EXT_URI,
        ns_p14 = NS_P14,
        embed = embed_id,
    )
}

/// `p:pic` video with its poster frame
pub fn video_xml(video: &VideoObject, id: usize) -> String {
    let o = &video.options;
    let blip = match &video.poster {
        Some(poster) => format!(r#"<a:blip r:embed="{}"/>"#, poster.rel_id),
        None => "<a:blip/>".to_string(),
    };
    format!(
        r#"<p:pic>{nv}<p:blipFill>{blip}<a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr>{geometry}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#,
        nv = media_nv_pr(
            id,
            "Video",
            "a:videoFile",
            &video.media.rel_id,
            &video.media.embed_rel_id
        ),
        blip = blip,
        geometry = xfrm(
            "a:xfrm",
            inch_to_emu(o.x),
            inch_to_emu(o.y),
            inch_to_emu(o.width),
            inch_to_emu(o.height),
            0
        ),
    )
}

/// `p:pic` audio icon
pub fn audio_xml(audio: &AudioObject, id: usize) -> String {
    let o = &audio.options;
    let hidden = if o.hidden { "<a:noFill/>" } else { "" };
    format!(
        r#"<p:pic>{nv}<p:blipFill><a:blip/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr>{geometry}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>{hidden}</p:spPr></p:pic>"#,
        nv = media_nv_pr(
            id,
            "Audio",
            "a:audioFile",
            &audio.media.rel_id,
            &audio.media.embed_rel_id
        ),
        geometry = xfrm(
            "a:xfrm",
            inch_to_emu(o.x),
            inch_to_emu(o.y),
            inch_to_emu(o.width),
            inch_to_emu(o.height),
            0
        ),
        hidden = hidden,
    )
}
