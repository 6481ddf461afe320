mod common;

use common::{chord, open, shell, shifted_chord, state_of};
use magpie::toolkit::{WindowState, WindowToolkit};
use smithay::input::keyboard::Keysym;

#[test]
fn each_window_lives_in_exactly_one_workspace() {
    let mut shell = shell(3);
    let (_, first) = open(&mut shell, "editor");
    shell.handle_event(&chord(Keysym::Up));
    let (_, second) = open(&mut shell, "browser");
    shell.handle_event(&chord(Keysym::Up));
    let (_, third) = open(&mut shell, "terminal");

    for window in [first, second, third] {
        assert_eq!(shell.toolkit.workspaces_containing(window).len(), 1);
    }

    let handles = shell.policy.workspaces().handles().to_vec();
    assert_eq!(shell.toolkit.windows_in_workspace(handles[0]), vec![first]);
    assert_eq!(shell.toolkit.windows_in_workspace(handles[1]), vec![second]);
    assert_eq!(shell.toolkit.windows_in_workspace(handles[2]), vec![third]);
}

#[test]
fn only_the_active_workspace_is_visible() {
    let mut shell = shell(2);
    let (_, first) = open(&mut shell, "editor");
    shell.handle_event(&chord(Keysym::Up));
    let (_, second) = open(&mut shell, "browser");

    assert_eq!(state_of(&shell, first), WindowState::Hidden);
    assert!(shell.policy.workspaces().is_hidden(first));
    assert_eq!(state_of(&shell, second), WindowState::Restored);
    assert_eq!(shell.toolkit.active_window(), Some(second));

    shell.handle_event(&chord(Keysym::Down));
    assert_eq!(state_of(&shell, first), WindowState::Restored);
    assert_eq!(state_of(&shell, second), WindowState::Hidden);
    assert_eq!(shell.toolkit.active_window(), Some(first));
}

#[test]
fn ring_wraps_in_both_directions() {
    let mut shell = shell(4);
    assert_eq!(shell.policy.workspaces().active_slot(), 0);

    shell.handle_event(&chord(Keysym::Down));
    assert_eq!(shell.policy.workspaces().active_slot(), 3);

    shell.handle_event(&chord(Keysym::Up));
    assert_eq!(shell.policy.workspaces().active_slot(), 0);
}

#[test]
fn returning_to_a_workspace_restores_its_focus() {
    let mut shell = shell(4);
    let (_, editor) = open(&mut shell, "editor");
    let (_, browser) = open(&mut shell, "browser");
    shell.toolkit.select_active_window(editor);

    shell.handle_event(&chord(Keysym::Down));
    assert_eq!(shell.toolkit.active_window(), None);
    assert_eq!(shell.policy.workspaces().resume_window(0), Some(editor));

    shell.handle_event(&chord(Keysym::Up));
    assert_eq!(shell.toolkit.active_window(), Some(editor));
    assert_eq!(state_of(&shell, browser), WindowState::Restored);
}

#[test]
fn shifted_switch_takes_the_active_window_along() {
    let mut shell = shell(3);
    let (_, editor) = open(&mut shell, "editor");
    let (_, browser) = open(&mut shell, "browser");
    shell.toolkit.select_active_window(editor);

    shell.handle_event(&shifted_chord(Keysym::Up));

    let handles = shell.policy.workspaces().handles().to_vec();
    assert_eq!(shell.toolkit.workspaces_containing(editor), vec![handles[1]]);
    assert_eq!(state_of(&shell, editor), WindowState::Restored);
    assert_eq!(state_of(&shell, browser), WindowState::Hidden);
    assert_eq!(shell.toolkit.active_window(), Some(editor));
}

#[test]
fn wallpaper_stays_visible_everywhere() {
    let mut shell = shell(2);
    let wallpaper = shell.spawn_wallpaper();

    shell.handle_event(&chord(Keysym::Up));
    assert_eq!(state_of(&shell, wallpaper), WindowState::Restored);
    assert!(!shell.policy.workspaces().is_hidden(wallpaper));
}

#[test]
fn maximized_window_comes_back_maximized() {
    let mut shell = shell(2);
    let (_, editor) = open(&mut shell, "editor");
    shell.handle_event(&chord(Keysym::space));
    assert_eq!(state_of(&shell, editor), WindowState::Maximized);

    shell.handle_event(&chord(Keysym::Up));
    assert_eq!(state_of(&shell, editor), WindowState::Hidden);

    shell.handle_event(&chord(Keysym::Down));
    assert_eq!(state_of(&shell, editor), WindowState::Maximized);
    let zone = shell.toolkit.active_application_zone();
    assert_eq!(shell.toolkit.info_for(editor).unwrap().geometry(), zone);
}
