//! Application-level tests for dirnav
//!
//! These tests drive [AppState] with crossterm key events the way the event loop does and
//! check the resulting listing, selection, prompt and status line against a real directory.
//!
//! Every test works inside its own temporary directory, removed when the test ends.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use dirnav::app::{AppState, KeypressResult, LayoutMetrics, PromptState, StatusKind};
use dirnav::config::Config;
use dirnav::core::LaunchKind;
use std::error;
use std::fs;
use std::path::Path;
use tempfile::{TempDir, tempdir};

fn press(app: &mut AppState, code: KeyCode) -> KeypressResult {
    app.handle_keypress(KeyEvent::new(code, KeyModifiers::NONE))
}

fn type_text(app: &mut AppState, text: &str) {
    for ch in text.chars() {
        press(app, KeyCode::Char(ch));
    }
}

fn clear_input(app: &mut AppState) {
    press(app, KeyCode::End);
    while app.prompt().input().is_some_and(|(buffer, _)| !buffer.is_empty()) {
        press(app, KeyCode::Backspace);
    }
}

fn names(app: &AppState) -> Vec<String> {
    app.nav()
        .entries()
        .iter()
        .map(|e| e.name_str().into_owned())
        .collect()
}

fn selected_name(app: &AppState) -> Option<String> {
    app.nav().selected_entry().map(|e| e.name_str().into_owned())
}

fn select(app: &mut AppState, name: &str) {
    press(app, KeyCode::Home);
    while selected_name(app).as_deref() != Some(name) {
        let before = app.nav().selected_idx();
        press(app, KeyCode::Down);
        assert_ne!(before, app.nav().selected_idx(), "'{name}' not in listing");
    }
}

/// `Sub/`, an executable `a.py` and `b.txt`.
fn sandbox() -> Result<TempDir, Box<dyn error::Error>> {
    let dir = tempdir()?;
    fs::create_dir(dir.path().join("Sub"))?;
    fs::write(dir.path().join("a.py"), "print('hi')\n")?;
    fs::write(dir.path().join("b.txt"), "bee")?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir.path().join("a.py"), fs::Permissions::from_mode(0o755))?;
    }
    Ok(dir)
}

#[test]
fn enter_empty_dir_and_return_to_parent() -> Result<(), Box<dyn error::Error>> {
    let dir = sandbox()?;
    let config = Config::default();
    let mut app = AppState::from_dir(&config, dir.path());

    assert_eq!(names(&app), ["Sub", "a.py", "b.txt"]);
    assert_eq!(app.nav().selected_idx(), Some(0));

    press(&mut app, KeyCode::Enter);
    assert!(app.nav().current_dir().ends_with("Sub"));
    assert!(app.nav().entries().is_empty());
    assert_eq!(app.nav().selected_idx(), None);

    // Moving in an empty listing is harmless
    press(&mut app, KeyCode::Down);
    assert_eq!(app.nav().selected_idx(), None);

    press(&mut app, KeyCode::Backspace);
    assert_eq!(app.nav().current_dir(), dir.path());
    assert_eq!(app.nav().selected_idx(), Some(0));
    assert_eq!(selected_name(&app).as_deref(), Some("Sub"));
    Ok(())
}

#[test]
fn parent_then_enter_restores_listing() -> Result<(), Box<dyn error::Error>> {
    let dir = sandbox()?;
    for name in ["x.md", "y.md", ".z"] {
        fs::write(dir.path().join("Sub").join(name), name)?;
    }
    let config = Config::default();
    let mut app = AppState::from_dir(&config, &dir.path().join("Sub"));
    let before = names(&app);

    press(&mut app, KeyCode::Char('u'));
    assert_eq!(selected_name(&app).as_deref(), Some("Sub"));
    press(&mut app, KeyCode::Char('l'));

    assert_eq!(names(&app), before);
    Ok(())
}

#[test]
fn delete_confirmed_removes_file() -> Result<(), Box<dyn error::Error>> {
    let dir = sandbox()?;
    let config = Config::default();
    let mut app = AppState::from_dir(&config, dir.path());

    select(&mut app, "b.txt");
    press(&mut app, KeyCode::Char('d'));
    assert!(matches!(app.prompt().state(), PromptState::Confirm { .. }));
    assert_eq!(app.prompt().label(), Some("Delete 'b.txt'? (y/N)"));

    press(&mut app, KeyCode::Char('y'));
    assert!(!dir.path().join("b.txt").exists());
    assert_eq!(names(&app), ["Sub", "a.py"]);
    assert!(!app.prompt().is_active());

    let status = app.status().ok_or("missing status")?;
    assert_eq!(status.kind(), StatusKind::Info);
    assert_eq!(status.text(), "Deleted 'b.txt'.");
    assert_eq!(app.nav().selected_idx(), Some(1));
    Ok(())
}

#[test]
fn delete_declined_keeps_file() -> Result<(), Box<dyn error::Error>> {
    let dir = sandbox()?;
    let config = Config::default();
    let mut app = AppState::from_dir(&config, dir.path());

    select(&mut app, "b.txt");
    press(&mut app, KeyCode::Char('d'));
    press(&mut app, KeyCode::Char('n'));

    assert!(dir.path().join("b.txt").exists());
    assert!(!app.prompt().is_active());
    let status = app.status().ok_or("missing status")?;
    assert!(!status.is_error());
    assert_eq!(status.text(), "Delete cancelled.");
    Ok(())
}

#[test]
fn delete_non_empty_directory_fails() -> Result<(), Box<dyn error::Error>> {
    let dir = sandbox()?;
    fs::write(dir.path().join("Sub/inner.txt"), "keep")?;
    let config = Config::default();
    let mut app = AppState::from_dir(&config, dir.path());

    select(&mut app, "Sub");
    press(&mut app, KeyCode::Char('d'));
    assert_eq!(app.prompt().label(), Some("Delete 'Sub/'? (y/N)"));
    press(&mut app, KeyCode::Char('y'));

    let status = app.status().ok_or("missing status")?;
    assert!(status.is_error());
    assert!(status.text().starts_with("Delete failed"));
    assert_eq!(fs::read_to_string(dir.path().join("Sub/inner.txt"))?, "keep");
    assert_eq!(names(&app), ["Sub", "a.py", "b.txt"]);
    Ok(())
}

#[test]
fn rename_onto_existing_file_is_refused() -> Result<(), Box<dyn error::Error>> {
    let dir = sandbox()?;
    let config = Config::default();
    let mut app = AppState::from_dir(&config, dir.path());

    select(&mut app, "b.txt");
    press(&mut app, KeyCode::Char('r'));
    assert_eq!(app.prompt().input(), Some(("b.txt", 5)));
    clear_input(&mut app);
    type_text(&mut app, "a.py");
    press(&mut app, KeyCode::Enter);

    let status = app.status().ok_or("missing status")?;
    assert!(status.is_error());
    assert!(status.text().contains("already exists"), "{}", status.text());
    assert_eq!(fs::read_to_string(dir.path().join("b.txt"))?, "bee");
    assert_eq!(fs::read_to_string(dir.path().join("a.py"))?, "print('hi')\n");
    Ok(())
}

#[test]
fn rename_selects_new_name() -> Result<(), Box<dyn error::Error>> {
    let dir = sandbox()?;
    let config = Config::default();
    let mut app = AppState::from_dir(&config, dir.path());

    select(&mut app, "b.txt");
    press(&mut app, KeyCode::Char('r'));
    clear_input(&mut app);
    type_text(&mut app, "0.txt");
    press(&mut app, KeyCode::Enter);

    assert_eq!(names(&app), ["Sub", "0.txt", "a.py"]);
    assert_eq!(selected_name(&app).as_deref(), Some("0.txt"));
    assert_eq!(
        app.status().map(|s| s.text()),
        Some("Renamed 'b.txt' to '0.txt'.")
    );
    Ok(())
}

#[test]
fn rename_into_directory_moves_file() -> Result<(), Box<dyn error::Error>> {
    let dir = sandbox()?;
    let config = Config::default();
    let mut app = AppState::from_dir(&config, dir.path());

    select(&mut app, "b.txt");
    press(&mut app, KeyCode::Char('r'));
    clear_input(&mut app);
    type_text(&mut app, "Sub");
    press(&mut app, KeyCode::Enter);

    assert!(dir.path().join("Sub/b.txt").exists());
    assert_eq!(names(&app), ["Sub", "a.py"]);
    assert!(!app.status().ok_or("missing status")?.is_error());
    Ok(())
}

#[test]
fn blank_or_same_destination_does_nothing() -> Result<(), Box<dyn error::Error>> {
    let dir = sandbox()?;
    let config = Config::default();
    let mut app = AppState::from_dir(&config, dir.path());

    select(&mut app, "b.txt");
    press(&mut app, KeyCode::Char('r'));
    press(&mut app, KeyCode::Enter);
    let status = app.status().ok_or("missing status")?;
    assert!(status.is_error());
    assert_eq!(status.text(), "Source and destination are the same.");

    press(&mut app, KeyCode::Char('c'));
    clear_input(&mut app);
    type_text(&mut app, "   ");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.status().map(|s| s.text()), Some("Copy cancelled."));

    assert_eq!(names(&app), ["Sub", "a.py", "b.txt"]);
    Ok(())
}

#[test]
fn escape_cancels_rename() -> Result<(), Box<dyn error::Error>> {
    let dir = sandbox()?;
    let config = Config::default();
    let mut app = AppState::from_dir(&config, dir.path());

    select(&mut app, "b.txt");
    press(&mut app, KeyCode::Char('r'));
    type_text(&mut app, "xyz");
    press(&mut app, KeyCode::Esc);

    assert!(!app.prompt().is_active());
    assert_eq!(app.status().map(|s| s.text()), Some("Rename cancelled."));
    assert!(dir.path().join("b.txt").exists());
    Ok(())
}

#[test]
fn copy_onto_existing_file_asks_first() -> Result<(), Box<dyn error::Error>> {
    let dir = sandbox()?;
    fs::write(dir.path().join("c.txt"), "sea")?;
    let config = Config::default();
    let mut app = AppState::from_dir(&config, dir.path());

    select(&mut app, "b.txt");
    press(&mut app, KeyCode::Char('c'));
    clear_input(&mut app);
    type_text(&mut app, "c.txt");
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.prompt().label(), Some("'c.txt' exists. Overwrite? (y/N)"));
    press(&mut app, KeyCode::Esc);
    assert_eq!(fs::read_to_string(dir.path().join("c.txt"))?, "sea");
    assert_eq!(app.status().map(|s| s.text()), Some("Copy cancelled."));

    press(&mut app, KeyCode::Char('c'));
    clear_input(&mut app);
    type_text(&mut app, "c.txt");
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Char('y'));

    assert_eq!(fs::read_to_string(dir.path().join("c.txt"))?, "bee");
    assert!(!app.status().ok_or("missing status")?.is_error());
    assert_eq!(selected_name(&app).as_deref(), Some("b.txt"));
    Ok(())
}

#[test]
fn copy_to_new_name_needs_no_confirmation() -> Result<(), Box<dyn error::Error>> {
    let dir = sandbox()?;
    let config = Config::default();
    let mut app = AppState::from_dir(&config, dir.path());

    select(&mut app, "b.txt");
    press(&mut app, KeyCode::Char('c'));
    press(&mut app, KeyCode::Home);
    type_text(&mut app, "copy_of_");
    press(&mut app, KeyCode::Enter);

    assert!(!app.prompt().is_active());
    assert_eq!(fs::read_to_string(dir.path().join("copy_of_b.txt"))?, "bee");
    assert_eq!(names(&app), ["Sub", "a.py", "b.txt", "copy_of_b.txt"]);
    Ok(())
}

#[test]
fn copying_a_directory_is_refused() -> Result<(), Box<dyn error::Error>> {
    let dir = sandbox()?;
    let config = Config::default();
    let mut app = AppState::from_dir(&config, dir.path());

    select(&mut app, "Sub");
    press(&mut app, KeyCode::Char('c'));
    assert!(!app.prompt().is_active());
    assert!(app.status().ok_or("missing status")?.is_error());
    Ok(())
}

#[test]
fn open_launches_pager_or_interpreter() -> Result<(), Box<dyn error::Error>> {
    let dir = sandbox()?;
    let config = Config::default();
    let mut app = AppState::from_dir(&config, dir.path());

    select(&mut app, "b.txt");
    let KeypressResult::Launch(cmd) = press(&mut app, KeyCode::Enter) else {
        panic!("expected a launch for a plain file");
    };
    assert_eq!(cmd.kind(), LaunchKind::Pager);
    assert_eq!(cmd.target(), dir.path().join("b.txt"));

    #[cfg(unix)]
    {
        select(&mut app, "a.py");
        let KeypressResult::Launch(cmd) = press(&mut app, KeyCode::Enter) else {
            panic!("expected a launch for a script");
        };
        assert_eq!(cmd.kind(), LaunchKind::Script);
        assert_eq!(cmd.program(), "python3");
    }
    Ok(())
}

#[cfg(unix)]
#[test]
fn finish_launch_reports_and_refreshes() -> Result<(), Box<dyn error::Error>> {
    use dirnav::core::{ExternalCommand, OpError};
    use std::os::unix::process::ExitStatusExt;
    use std::process::ExitStatus;

    let dir = sandbox()?;
    let config = Config::default();
    let mut app = AppState::from_dir(&config, dir.path());
    select(&mut app, "a.py");

    // Something the script left behind shows up after returning
    fs::write(dir.path().join("out.log"), "done")?;
    let script = ExternalCommand::script("python3", &dir.path().join("a.py"), false);
    app.finish_launch(&script, Ok(ExitStatus::from_raw(3 << 8)));

    assert_eq!(
        app.status().map(|s| s.text()),
        Some("Returned from 'a.py' (exit code 3).")
    );
    assert!(names(&app).contains(&"out.log".to_string()));
    assert_eq!(selected_name(&app).as_deref(), Some("a.py"));

    let pager = ExternalCommand::pager("no-such-pager", &dir.path().join("b.txt"));
    app.finish_launch(
        &pager,
        Err(OpError::ExternalProgramNotFound("no-such-pager".into())),
    );
    let status = app.status().ok_or("missing status")?;
    assert!(status.is_error());
    assert!(status.text().starts_with("Cannot view 'b.txt'"));
    assert_eq!(selected_name(&app).as_deref(), Some("b.txt"));
    Ok(())
}

#[test]
fn refresh_picks_up_external_changes() -> Result<(), Box<dyn error::Error>> {
    let dir = sandbox()?;
    let config = Config::default();
    let mut app = AppState::from_dir(&config, dir.path());
    select(&mut app, "b.txt");

    fs::write(dir.path().join("0.txt"), "")?;
    app.handle_keypress(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL));

    assert!(!app.prompt().is_active());
    assert_eq!(names(&app), ["Sub", "0.txt", "a.py", "b.txt"]);
    assert_eq!(selected_name(&app).as_deref(), Some("b.txt"));
    Ok(())
}

#[test]
fn refresh_of_vanished_directory_keeps_listing() -> Result<(), Box<dyn error::Error>> {
    let dir = sandbox()?;
    let sub = dir.path().join("Sub");
    fs::write(sub.join("kept.txt"), "")?;
    let config = Config::default();
    let mut app = AppState::from_dir(&config, &sub);

    fs::remove_dir_all(&sub)?;
    app.handle_keypress(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL));

    assert_eq!(app.nav().current_dir(), sub.as_path());
    assert_eq!(names(&app), ["kept.txt"]);
    assert_eq!(app.nav().selected_idx(), Some(0));
    assert!(app.status().ok_or("missing status")?.is_error());
    Ok(())
}

#[test]
fn entering_removed_directory_changes_nothing() -> Result<(), Box<dyn error::Error>> {
    let dir = sandbox()?;
    for name in ["Aa", "Bb", "Cc"] {
        fs::create_dir(dir.path().join(name))?;
    }
    let config = Config::default();
    let mut app = AppState::from_dir(&config, dir.path());
    app.update_layout_metrics(LayoutMetrics {
        width: 80,
        height: 6,
        list_rows: 2,
        too_small: false,
    });
    select(&mut app, "Cc");
    let (idx, scroll) = (app.nav().selected_idx(), app.nav().scroll());
    assert!(scroll > 0);

    fs::remove_dir(dir.path().join("Cc"))?;
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.nav().current_dir(), dir.path());
    assert_eq!(names(&app), ["Aa", "Bb", "Cc", "Sub", "a.py", "b.txt"]);
    assert_eq!(app.nav().selected_idx(), idx);
    assert_eq!(app.nav().scroll(), scroll);
    assert!(app.status().ok_or("missing status")?.is_error());
    Ok(())
}

#[test]
fn parent_that_cannot_be_listed_changes_nothing() -> Result<(), Box<dyn error::Error>> {
    let dir = tempdir()?;
    let outer = dir.path().join("outer");
    let inner = outer.join("inner");
    fs::create_dir_all(&inner)?;
    fs::write(inner.join("x.txt"), "")?;
    fs::write(inner.join("y.txt"), "")?;
    let config = Config::default();
    let mut app = AppState::from_dir(&config, &inner);
    select(&mut app, "y.txt");

    fs::remove_dir_all(&outer)?;
    press(&mut app, KeyCode::Left);

    assert_eq!(app.nav().current_dir(), inner.as_path());
    assert_eq!(names(&app), ["x.txt", "y.txt"]);
    assert_eq!(selected_name(&app).as_deref(), Some("y.txt"));
    assert!(app.status().ok_or("missing status")?.is_error());
    Ok(())
}

#[cfg(target_os = "linux")]
#[test]
fn unchanged_prompt_keeps_non_utf8_name() -> Result<(), Box<dyn error::Error>> {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempdir()?;
    let original = dir.path().join(OsStr::from_bytes(b"caf\xe9.txt"));
    fs::write(&original, "x")?;
    let config = Config::default();
    let mut app = AppState::from_dir(&config, dir.path());

    for key in ['r', 'c'] {
        press(&mut app, KeyCode::Char(key));
        assert!(app.prompt().is_active());
        press(&mut app, KeyCode::Enter);

        let status = app.status().ok_or("missing status")?;
        assert_eq!(status.text(), "Source and destination are the same.");
        assert!(original.exists());
        assert_eq!(fs::read_dir(dir.path())?.count(), 1);
    }
    Ok(())
}

#[test]
fn small_terminal_only_quits() -> Result<(), Box<dyn error::Error>> {
    let dir = sandbox()?;
    let config = Config::default();
    let mut app = AppState::from_dir(&config, dir.path());
    app.update_layout_metrics(LayoutMetrics {
        width: 10,
        height: 3,
        list_rows: 0,
        too_small: true,
    });

    assert_eq!(press(&mut app, KeyCode::Down), KeypressResult::Continue);
    assert_eq!(app.nav().selected_idx(), Some(0));
    assert_eq!(press(&mut app, KeyCode::Char('q')), KeypressResult::Quit);
    Ok(())
}

#[test]
fn unreadable_start_dir_still_builds_state() -> Result<(), Box<dyn error::Error>> {
    let dir = tempdir()?;
    let missing = dir.path().join("gone");
    let config = Config::default();
    let app = AppState::from_dir(&config, &missing);

    assert!(app.nav().entries().is_empty());
    assert!(app.status().ok_or("missing status")?.is_error());
    assert_eq!(app.nav().current_dir(), Path::new(&missing));
    Ok(())
}

#[test]
fn empty_start_dir_says_so() -> Result<(), Box<dyn error::Error>> {
    let dir = tempdir()?;
    let config = Config::default();
    let app = AppState::from_dir(&config, dir.path());

    assert_eq!(app.status().map(|s| s.text()), Some("Directory is empty."));
    assert_eq!(app.nav().selected_idx(), None);
    Ok(())
}
