mod common;

use common::{chord, open, shell, shifted_chord};
use magpie::{
    input::{KeyAction, KeyEvent, LifecycleEvent, Modifiers, ShellEvent},
    launcher::LaunchMode,
    toolkit::{WindowState, WindowToolkit},
};
use smithay::input::keyboard::Keysym;

#[test]
fn quit_is_vetoed_while_application_windows_are_open() {
    let mut shell = shell(2);
    shell.spawn_wallpaper();
    let (_, editor) = open(&mut shell, "editor");

    assert!(!shell.handle_event(&chord(Keysym::BackSpace)));
    assert!(!shell.toolkit.stop_requested());

    shell.close_window(editor);
    assert_eq!(shell.policy.commands().app_windows(), 0);

    assert!(shell.handle_event(&chord(Keysym::BackSpace)));
    assert!(shell.toolkit.stop_requested());
}

#[test]
fn launcher_chord_shows_launcher_and_marks_its_app() {
    let mut shell = shell(2);
    let launcher_app = shell.launcher.app.unwrap();

    assert!(shell.handle_event(&chord(Keysym::a)));
    assert_eq!(shell.launcher.shown, 1);
    assert!(shell.policy.commands().is_shell_app(launcher_app));

    shell.close_app(launcher_app);
    assert!(!shell.policy.commands().is_shell_app(launcher_app));
}

#[test]
fn terminal_chords_pick_the_display_protocol() {
    let mut shell = shell(2);

    shell.handle_event(&chord(Keysym::t));
    shell.handle_event(&chord(Keysym::x));

    assert_eq!(
        shell.launcher.launched,
        vec![
            ("weston-terminal".to_owned(), LaunchMode::Wayland),
            ("weston-terminal".to_owned(), LaunchMode::X11),
        ]
    );
}

#[test]
fn disabling_shell_commands_passes_chords_through() {
    let mut shell = shell(2);
    let (_, editor) = open(&mut shell, "editor");

    assert!(shell.handle_event(&chord(Keysym::Delete)));
    assert!(!shell.policy.commands().shell_keyboard_enabled());

    assert!(!shell.handle_event(&chord(Keysym::Up)));
    assert!(!shell.handle_event(&chord(Keysym::Left)));
    assert_eq!(shell.policy.workspaces().active_slot(), 0);
    assert_eq!(shell.toolkit.info_for(editor).unwrap().state, WindowState::Restored);

    assert!(shell.handle_event(&chord(Keysym::Delete)));
    assert!(shell.handle_event(&chord(Keysym::Up)));
    assert_eq!(shell.policy.workspaces().active_slot(), 1);
}

#[test]
fn docking_cycles_through_widths() {
    let mut shell = shell(2);
    let (_, editor) = open(&mut shell, "editor");

    let mut widths = Vec::new();
    for _ in 0..4 {
        shell.handle_event(&chord(Keysym::Left));
        let info = shell.toolkit.info_for(editor).unwrap();
        assert_eq!(info.top_left.x, 0);
        assert_eq!(info.size.h, 800);
        widths.push(info.size.w);
    }
    assert_eq!(widths, vec![600, 400, 800, 600]);

    shell.handle_event(&chord(Keysym::Right));
    let info = shell.toolkit.info_for(editor).unwrap();
    assert_eq!(info.size.w, 600);
    assert_eq!(info.top_left.x, 600);
}

#[test]
fn shifted_dock_chord_still_docks() {
    let mut shell = shell(2);
    let (_, editor) = open(&mut shell, "editor");

    assert!(shell.handle_event(&shifted_chord(Keysym::Right)));
    let info = shell.toolkit.info_for(editor).unwrap();
    assert_eq!(info.state, WindowState::VertMaximized);
    assert_eq!((info.top_left.x, info.size.w), (600, 600));
}

#[test]
fn alt_f4_closes_the_focused_window() {
    let mut shell = shell(2);
    let (_, editor) = open(&mut shell, "editor");
    assert_eq!(shell.toolkit.active_window(), Some(editor));

    let close = ShellEvent::Key(KeyEvent::new(Keysym::F4, KeyAction::Down, Modifiers::ALT));
    assert!(shell.handle_event(&close));
    shell.flush_close_requests();

    assert!(shell.toolkit.info_for(editor).is_none());
    assert_eq!(shell.policy.commands().app_windows(), 0);
}

#[test]
fn lifecycle_events_are_always_consumed() {
    let mut shell = shell(2);
    let (app, _) = open(&mut shell, "editor");
    assert!(shell.handle_event(&ShellEvent::Lifecycle(LifecycleEvent::DeleteApp(app.id))));
}

#[test]
fn ipc_requests_drive_the_session() {
    let mut shell = shell(2);

    assert_eq!(shell.handle_ipc_request("clients"), "No clients.\n");
    assert_eq!(shell.handle_ipc_request("open editor 300 200"), "ok 1\n");
    assert_eq!(shell.handle_ipc_request("key alt+ctrl+up"), "consumed\n");
    assert_eq!(shell.policy.workspaces().active_slot(), 1);
    assert_eq!(shell.handle_ipc_request("key alt+ctrl+backspace"), "ignored\n");

    let report = shell.handle_ipc_request("clients");
    assert!(report.starts_with("Client 1:\n"));
    assert!(report.contains("  app: editor\n"));
    assert!(report.contains("  workspace: 1\n"));
    assert!(report.contains("  hidden: true\n"));

    assert_eq!(shell.handle_ipc_request("close 1"), "ok\n");
    assert!(shell.handle_ipc_request("close 1").starts_with("error: no window"));
    assert!(shell.handle_ipc_request("launch").starts_with("error: unsupported command"));
}
