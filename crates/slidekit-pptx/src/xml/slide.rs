//! Slide parts (`ppt/slides/slideN.xml`) and their relationships.

use crate::constants::{
    NS_DRAWING, NS_PRESENTATION, NS_RELATIONSHIPS, REL_TYPE_AUDIO, REL_TYPE_CHART,
    REL_TYPE_IMAGE, REL_TYPE_MEDIA, REL_TYPE_SLIDE_LAYOUT, REL_TYPE_VIDEO,
};
use crate::model::{Background, SlideObject};
use crate::relationships::Relationships;
use crate::slide::Slide;
use crate::timing::{collect_triggers, timing_xml};

use super::objects::object_xml;
use super::solid_fill;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Emit `ppt/slides/slideN.xml`
pub fn slide_xml(slide: &Slide) -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push('\n');
    xml.push_str(&format!(
        r#"<p:sld xmlns:a="{}" xmlns:r="{}" xmlns:p="{}"><p:cSld>"#,
        NS_DRAWING, NS_RELATIONSHIPS, NS_PRESENTATION
    ));

    if let Some(background) = slide.background() {
        xml.push_str(&background_xml(background));
    }

    xml.push_str(concat!(
        r#"<p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
        r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#,
    ));

    // Ids 2..N in insertion order; an object that emits nothing still takes one
    for (i, object) in slide.objects().iter().enumerate() {
        xml.push_str(&object_xml(object, i + 2));
    }

    xml.push_str("</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");

    if let Some(timing) = timing_xml(&collect_triggers(slide.objects())) {
        xml.push_str(&timing);
    }

    xml.push_str("</p:sld>");
    xml
}

fn background_xml(background: &Background) -> String {
    let fill = match background {
        Background::Color(color) => solid_fill(color),
        Background::Image(media) => format!(
            r#"<a:blipFill><a:blip r:embed="{}"/><a:stretch><a:fillRect/></a:stretch></a:blipFill>"#,
            media.rel_id
        ),
    };
    format!("<p:bg><p:bgPr>{}<a:effectLst/></p:bgPr></p:bg>", fill)
}

/// Relationships of one slide: layout first, then each object's parts in
/// order, then the background picture
pub fn slide_rels(slide: &Slide) -> Relationships {
    let mut rels = Relationships::new();
    rels.add(
        "rId1",
        REL_TYPE_SLIDE_LAYOUT,
        "../slideLayouts/slideLayout1.xml",
    );

    for object in slide.objects() {
        match object {
            SlideObject::Image(image) => {
                rels.add(&image.media.rel_id, REL_TYPE_IMAGE, image.media.target());
            }
            SlideObject::Chart(chart) => {
                rels.add(
                    &chart.rel_id,
                    REL_TYPE_CHART,
                    format!("../charts/chart{}.xml", chart.index),
                );
            }
            SlideObject::Video(video) => {
                let target = video.media.target();
                rels.add(&video.media.rel_id, REL_TYPE_VIDEO, &target);
                rels.add(&video.media.embed_rel_id, REL_TYPE_MEDIA, target);
                if let Some(poster) = &video.poster {
                    rels.add(&poster.rel_id, REL_TYPE_IMAGE, poster.target());
                }
            }
            SlideObject::Audio(audio) => {
                let target = audio.media.target();
                rels.add(&audio.media.rel_id, REL_TYPE_AUDIO, &target);
                rels.add(&audio.media.embed_rel_id, REL_TYPE_MEDIA, target);
            }
            SlideObject::Text(_) | SlideObject::Shape(_) | SlideObject::Table(_) => {}
        }
    }

    if let Some(Background::Image(media)) = slide.background() {
        rels.add(&media.rel_id, REL_TYPE_IMAGE, media.target());
    }

    rels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        AudioOptions, BackgroundOptions, ShapeOptions, ShapeType, TableOptions, TextOptions,
        VideoOptions,
    };
    use crate::presentation::Presentation;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];

    #[test]
    fn test_empty_slide() {
        let mut pres = Presentation::new();
        pres.add_slide();
        let xml = slide_xml(&pres.slides()[0]);
        assert!(xml.starts_with(XML_DECLARATION));
        assert!(xml.contains(r#"<p:cNvPr id="1" name=""/>"#));
        assert!(xml.contains("<a:chExt cx=\"0\" cy=\"0\"/>"));
        assert!(xml.contains("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>"));
        assert!(!xml.contains("<p:bg>"));
        assert!(!xml.contains("<p:timing>"));
        assert!(xml.ends_with("</p:sld>"));

        let rels = slide_rels(&pres.slides()[0]);
        assert_eq!(rels.len(), 1);
        assert_eq!(
            rels.get("rId1").map(|r| r.target.as_str()),
            Some("../slideLayouts/slideLayout1.xml")
        );
    }

    #[test]
    fn test_object_ids_follow_insertion_order() {
        let mut pres = Presentation::new();
        pres.add_slide()
            .add_text("a", TextOptions::default())
            .add_table(vec![Vec::new()], TableOptions::default())
            .add_shape(ShapeType::Rect, ShapeOptions::default());
        let xml = slide_xml(&pres.slides()[0]);
        assert!(xml.contains(r#"<p:cNvPr id="2" name="TextBox 2"/>"#));
        // The empty table consumed id 3
        assert!(!xml.contains("Table 3"));
        assert!(xml.contains(r#"<p:cNvPr id="4" name="Shape 4"/>"#));
    }

    #[test]
    fn test_color_background() {
        let mut pres = Presentation::new();
        pres.add_slide().set_background(BackgroundOptions {
            color: "purple".to_string(),
            ..Default::default()
        });
        let xml = slide_xml(&pres.slides()[0]);
        assert!(xml.contains(
            r#"<p:bg><p:bgPr><a:solidFill><a:srgbClr val="800080"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>"#
        ));
    }

    #[test]
    fn test_image_background_rel_comes_last() {
        let mut pres = Presentation::new();
        pres.add_slide()
            .set_background(BackgroundOptions {
                data: PNG.to_vec(),
                ..Default::default()
            })
            .add_chart(
                crate::chart::ChartType::Pie,
                vec![crate::chart::ChartSeries::new("s", ["a"], vec![1.0])],
                Default::default(),
            );
        let slide = &pres.slides()[0];
        let xml = slide_xml(slide);
        assert!(xml.contains(r#"<a:blipFill><a:blip r:embed="rId101"/>"#));

        let rels = slide_rels(slide);
        let ids: Vec<&str> = rels.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["rId1", "rId201", "rId101"]);
    }

    #[test]
    fn test_media_rels_and_timing() {
        let mut pres = Presentation::new();
        pres.add_slide()
            .add_video(VideoOptions {
                data: b"\x00\x00\x00\x18ftypmp42".to_vec(),
                poster_data: PNG.to_vec(),
                auto_play: true,
                ..Default::default()
            })
            .add_audio(AudioOptions {
                data: b"ID3\x03\x00".to_vec(),
                auto_play: true,
                hidden: true,
                ..Default::default()
            });
        let slide = &pres.slides()[0];

        let rels = slide_rels(slide);
        let summary: Vec<(&str, &str)> = rels
            .iter()
            .map(|r| (r.id.as_str(), r.rel_type.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("rId1", REL_TYPE_SLIDE_LAYOUT),
                ("rId301", REL_TYPE_VIDEO),
                ("rId501", REL_TYPE_MEDIA),
                ("rId302", REL_TYPE_IMAGE),
                ("rId403", REL_TYPE_AUDIO),
                ("rId503", REL_TYPE_MEDIA),
            ]
        );
        assert_eq!(
            rels.get("rId501").map(|r| r.target.as_str()),
            Some("../media/video1.mp4")
        );

        let xml = slide_xml(slide);
        assert!(xml.contains("<p:timing>"));
        assert!(xml.contains(r#"<p:spTgt spid="2"/>"#));
        assert!(xml.contains(r#"<p:spTgt spid="3"/>"#));
        assert!(xml.contains(r#"showWhenStopped="0""#));
    }

    #[test]
    fn test_flagged_video_without_auto_play() {
        let mut pres = Presentation::new();
        pres.add_slide().add_video(VideoOptions {
            data: b"\x00\x00\x00\x18ftypmp42".to_vec(),
            looping: true,
            muted: true,
            ..Default::default()
        });
        let xml = slide_xml(&pres.slides()[0]);
        assert!(xml.contains("<p:timing>"));
        assert!(!xml.contains("playFrom"));
        assert!(xml.contains(r#"<p:cMediaNode vol="80000" mute="1">"#));
        assert!(xml.contains(r#"repeatCount="indefinite""#));
        assert!(xml.contains(r#"<p:spTgt spid="2"/>"#));
    }
}
