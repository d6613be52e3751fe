//! Integration tests for the keypad settings menu.

use pomodesk::fsm::context::MachineEvent;
use pomodesk::fsm::mode::{Message, Mode, ResumeMode};
use pomodesk::fsm::render::Rgb;
use pomodesk::fsm::settings::{SettingsError, SettingsField};

use crate::mock_hw::{Rig, STUDY_CARD};

#[test]
fn saving_focus_time_updates_the_session() {
    let mut rig = Rig::new();
    rig.press('6');
    assert_eq!(rig.hw.last_text(), Some("S1-Fo"));
    assert_eq!(rig.hw.last_indicator(), Some(Rgb::ORANGE));

    rig.press('1');
    assert_eq!(
        rig.mode(),
        Mode::SettingsEdit {
            field: SettingsField::FocusTime
        }
    );
    assert_eq!(rig.hw.last_text(), Some("Fo00"));

    rig.type_keys("30");
    assert_eq!(rig.hw.last_text(), Some("Fo30"));

    rig.press('*');
    assert_eq!(rig.mode(), Mode::SettingsSaveSuccess);
    assert_eq!(rig.hw.last_text(), Some("SAvE"));
    assert_eq!(rig.app.context().session.focus_secs, 30 * 60);
    assert!(rig.sink.saw(MachineEvent::SettingsSaved {
        field: SettingsField::FocusTime,
        value: 30
    }));

    rig.ticks(2);
    assert_eq!(rig.mode(), Mode::SettingsMenu);
}

#[test]
fn digit_past_the_maximum_is_refused() {
    let mut rig = Rig::new();
    rig.type_keys("627");
    assert_eq!(rig.hw.last_text(), Some("rE07"));

    rig.press('0');
    assert_eq!(
        rig.mode(),
        Mode::TemporaryMessage {
            message: Message::MaxExceeded,
            resume: ResumeMode::SettingsEdit(SettingsField::RestTime)
        }
    );
    assert_eq!(rig.hw.last_text(), Some("OvEr"));
    assert_eq!(rig.hw.last_indicator(), Some(Rgb::RED));

    rig.tick();
    assert_eq!(
        rig.mode(),
        Mode::SettingsEdit {
            field: SettingsField::RestTime
        }
    );
    assert_eq!(rig.hw.last_text(), Some("rE07"));

    rig.press('*');
    assert_eq!(rig.app.context().session.rest_secs, 7 * 60);
}

#[test]
fn empty_entry_fails_and_leaves_session_alone() {
    let mut rig = Rig::new();
    rig.type_keys("64*");
    assert_eq!(rig.mode(), Mode::SettingsSaveFailed);
    assert_eq!(rig.hw.last_text(), Some("FAIL"));
    assert!(rig.sink.saw(MachineEvent::SettingsRejected {
        field: SettingsField::LightThreshold,
        error: SettingsError::Empty
    }));
    assert_eq!(rig.app.context().session.low_light_threshold, 150);

    rig.press('#');
    assert_eq!(rig.mode(), Mode::SettingsMenu);
}

#[test]
fn cancel_drops_the_draft() {
    let mut rig = Rig::new();
    rig.type_keys("6345#");
    assert_eq!(rig.mode(), Mode::SettingsMenu);
    assert!(rig.app.context().settings.draft().is_none());
    assert_eq!(rig.app.context().session.long_rest_secs, 15 * 60);

    rig.press('#');
    assert_eq!(rig.mode(), Mode::Idle);
}

#[test]
fn star_walks_the_menu_and_wraps() {
    let mut rig = Rig::new();
    rig.press('6');
    let mut seen = vec![rig.hw.last_text().map(str::to_owned)];
    for _ in 0..4 {
        rig.press('*');
        seen.push(rig.hw.last_text().map(str::to_owned));
    }
    let seen: Vec<_> = seen.into_iter().flatten().collect();
    assert_eq!(seen, ["S1-Fo", "S2-rE", "S3-Lr", "S4-LI", "S1-Fo"]);
}

#[test]
fn raised_light_threshold_applies_to_the_next_focus() {
    let mut rig = Rig::new();
    rig.type_keys("64500*");
    assert_eq!(rig.app.context().session.low_light_threshold, 500);
    rig.ticks(2);
    rig.press('#');
    assert_eq!(rig.mode(), Mode::Idle);

    // 400 lux was bright enough at the default threshold.
    rig.present_card(STUDY_CARD);
    rig.ticks(2);
    assert_eq!(rig.mode(), Mode::LowLightWarning);
}
