use screenprofile::{Inventory, Mode, Output, Position, Profile, ProfileError, Size};

fn fixture() -> Inventory {
    serde_json::from_str(include_str!("fixtures/inventory.json")).expect("fixture is valid")
}

fn output(name: &str, priority: i32, current_mode_id: &str) -> Output {
    Output {
        name: name.to_string(),
        current_mode_id: current_mode_id.to_string(),
        enabled: true,
        size: Size::new(1920, 1080),
        position: Position::new(0, 0),
        scale: 1.0,
        modes: vec![Mode {
            id: "1".to_string(),
            name: "1920x1080@60".to_string(),
            refresh_rate: 60.0,
            size: Size::new(1920, 1080),
        }],
        priority,
    }
}

#[test]
fn test_extract_enabled_outputs_by_priority() -> Result<(), Box<dyn std::error::Error>> {
    let _ = env_logger::builder().is_test(true).try_init();

    let profile = Profile::extract(&fixture())?;
    println!("Extracted profile: {:#?}", profile);

    let names: Vec<&str> = profile.screens.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["DP-2", "eDP-1"], "Disabled HDMI-A-1 should be dropped");

    let external = &profile.screens[0];
    assert_eq!(external.size, Size::new(2560, 1440));
    assert_eq!(external.position, Position::new(0, 0));
    assert_eq!(external.refresh_rate, 143.912);
    assert_eq!(external.scale, 1.0);

    let laptop = &profile.screens[1];
    assert_eq!(laptop.size, Size::new(2560, 1600));
    assert_eq!(laptop.position, Position::new(2560, 0));
    assert_eq!(laptop.refresh_rate, 165.0);
    assert_eq!(laptop.scale, 1.5);

    Ok(())
}

#[test]
fn test_extract_is_stable_on_equal_priority() -> Result<(), Box<dyn std::error::Error>> {
    let _ = env_logger::builder().is_test(true).try_init();

    let inventory = Inventory {
        outputs: vec![
            output("DP-3", 1, "1"),
            output("DP-1", 0, "1"),
            output("DP-2", 1, "1"),
            output("HDMI-A-1", 0, "1"),
        ],
    };

    let first = Profile::extract(&inventory)?;
    let names: Vec<&str> = first.screens.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["DP-1", "HDMI-A-1", "DP-3", "DP-2"]);

    for _ in 0..5 {
        assert_eq!(Profile::extract(&inventory)?, first);
    }

    Ok(())
}

#[test]
fn test_extract_fails_on_unknown_current_mode() {
    let _ = env_logger::builder().is_test(true).try_init();

    let inventory = Inventory {
        outputs: vec![output("DP-1", 0, "1"), output("DP-2", 1, "42")],
    };

    match Profile::extract(&inventory) {
        Err(ProfileError::Integrity { output, mode_id }) => {
            assert_eq!(output, "DP-2");
            assert_eq!(mode_id, "42");
        }
        other => panic!("Expected an integrity error, got {:?}", other),
    }
}

#[test]
fn test_extract_fails_on_zero_refresh_rate() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut broken = output("DP-1", 0, "1");
    broken.modes[0].refresh_rate = 0.0;
    let inventory = Inventory {
        outputs: vec![broken],
    };

    assert!(matches!(
        Profile::extract(&inventory),
        Err(ProfileError::Integrity { .. })
    ));
}

#[test]
fn test_extract_ignores_disabled_outputs_without_mode() -> Result<(), Box<dyn std::error::Error>> {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut disabled = output("HDMI-A-1", 0, "");
    disabled.enabled = false;
    let inventory = Inventory {
        outputs: vec![disabled, output("DP-1", 1, "1")],
    };

    let profile = Profile::extract(&inventory)?;
    assert_eq!(profile.screens.len(), 1);
    assert_eq!(profile.screens[0].name, "DP-1");

    Ok(())
}
