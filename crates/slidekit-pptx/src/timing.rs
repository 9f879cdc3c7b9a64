//! Slide timing trees for media playback.
//!
//! The tree is a root `tmRoot` node. When anything plays on slide entry it
//! holds the main sequence, where each auto-play trigger gets three nested
//! parallel nodes, the innermost one calling `playFrom(0.0)` on the media
//! shape. Playback attributes (loop, mute, hidden icon) sit on one
//! `p:video`/`p:audio` node per media object after the sequence, whether or
//! not it auto-plays.

use crate::model::SlideObject;

/// Volume written on every media node (80%)
const MEDIA_VOLUME: u32 = 80_000;

/// Playback settings of one media object on a slide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaTrigger {
    /// `cNvPr` id of the media shape
    pub shape_id: usize,
    pub is_video: bool,
    /// Start playback on slide entry
    pub auto_play: bool,
    pub looping: bool,
    pub muted: bool,
    pub hidden: bool,
}

impl MediaTrigger {
    /// Whether anything needs a timing node
    fn is_needed(&self) -> bool {
        self.auto_play || self.looping || self.muted || self.hidden
    }
}

/// Collect media that auto-plays or carries playback flags; ids follow
/// emission order (first object is 2)
pub fn collect_triggers(objects: &[SlideObject]) -> Vec<MediaTrigger> {
    objects
        .iter()
        .enumerate()
        .filter_map(|(i, obj)| {
            let shape_id = i + 2;
            match obj {
                SlideObject::Video(v) => Some(MediaTrigger {
                    shape_id,
                    is_video: true,
                    auto_play: v.options.auto_play,
                    looping: v.options.looping,
                    muted: v.options.muted,
                    hidden: false,
                }),
                SlideObject::Audio(a) => Some(MediaTrigger {
                    shape_id,
                    is_video: false,
                    auto_play: a.options.auto_play,
                    looping: a.options.looping,
                    muted: false,
                    hidden: a.options.hidden,
                }),
                _ => None,
            }
        })
        .filter(MediaTrigger::is_needed)
        .collect()
}

/// Build `<p:timing>`, or `None` when no media needs a node
pub fn timing_xml(triggers: &[MediaTrigger]) -> Option<String> {
    if triggers.is_empty() {
        return None;
    }

    let mut xml = String::from(
        r#"<p:timing><p:tnLst><p:par><p:cTn id="1" dur="indefinite" restart="never" nodeType="tmRoot"><p:childTnLst>"#,
    );
    let mut next_id = 2;

    let auto_play: Vec<&MediaTrigger> = triggers.iter().filter(|t| t.auto_play).collect();
    if !auto_play.is_empty() {
        xml.push_str(&sequence_xml(&auto_play, &mut next_id));
    }

    for trigger in triggers {
        xml.push_str(&media_node_xml(trigger, next_id));
        next_id += 1;
    }

    xml.push_str("</p:childTnLst></p:cTn></p:par></p:tnLst></p:timing>");
    Some(xml)
}

/// Main sequence starting every auto-play trigger on slide entry
fn sequence_xml(triggers: &[&MediaTrigger], next_id: &mut usize) -> String {
    let mut xml = format!(
        r#"<p:seq concurrent="1" nextAc="seek"><p:cTn id="{}" dur="indefinite" nodeType="mainSeq"><p:childTnLst>"#,
        *next_id
    );
    *next_id += 1;

    for trigger in triggers {
        let outer = *next_id;
        let middle = *next_id + 1;
        let effect = *next_id + 2;
        let behavior = *next_id + 3;
        *next_id += 4;

        xml.push_str(&format!(
            concat!(
                r#"<p:par><p:cTn id="{outer}" fill="hold"><p:stCondLst><p:cond delay="0"/></p:stCondLst><p:childTnLst>"#,
                r#"<p:par><p:cTn id="{middle}" fill="hold"><p:stCondLst><p:cond delay="0"/></p:stCondLst><p:childTnLst>"#,
                r#"<p:par><p:cTn id="{effect}" presetID="1" presetClass="mediacall" presetSubtype="0" fill="hold" nodeType="afterEffect"><p:stCondLst><p:cond delay="0"/></p:stCondLst><p:childTnLst>"#,
                r#"<p:cmd type="call" cmd="playFrom(0.0)"><p:cBhvr><p:cTn id="{behavior}" dur="1" fill="hold"/><p:tgtEl><p:spTgt spid="{spid}"/></p:tgtEl></p:cBhvr></p:cmd>"#,
                "</p:childTnLst></p:cTn></p:par>",
                "</p:childTnLst></p:cTn></p:par>",
                "</p:childTnLst></p:cTn></p:par>",
            ),
            outer = outer,
            middle = middle,
            effect = effect,
            behavior = behavior,
            spid = trigger.shape_id,
        ));
    }

    xml.push_str(
        r#"</p:childTnLst></p:cTn><p:prevCondLst><p:cond evt="onPrev" delay="0"><p:tgtEl><p:sldTgt/></p:tgtEl></p:cond></p:prevCondLst><p:nextCondLst><p:cond evt="onNext" delay="0"><p:tgtEl><p:sldTgt/></p:tgtEl></p:cond></p:nextCondLst></p:seq>"#,
    );
    xml
}

fn media_node_xml(trigger: &MediaTrigger, id: usize) -> String {
    let tag = if trigger.is_video { "p:video" } else { "p:audio" };

    let mut attrs = format!(r#" vol="{}""#, MEDIA_VOLUME);
    if trigger.muted {
        attrs.push_str(r#" mute="1""#);
    }
    if trigger.hidden {
        attrs.push_str(r#" showWhenStopped="0""#);
    }
    let repeat = if trigger.looping {
        r#" repeatCount="indefinite""#
    } else {
        ""
    };

    format!(
        r#"<{tag}><p:cMediaNode{attrs}><p:cTn id="{id}"{repeat} fill="hold"><p:stCondLst><p:cond delay="indefinite"/></p:stCondLst></p:cTn><p:tgtEl><p:spTgt spid="{spid}"/></p:tgtEl></p:cMediaNode></{tag}>"#,
        tag = tag,
        attrs = attrs,
        id = id,
        repeat = repeat,
        spid = trigger.shape_id,
    )
}
