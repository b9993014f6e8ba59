//! Scripts run against a layout, end to end through the library.

use cpmove::namespace::parse_layout;
use cpmove::{parse_script, NamePolicy, Session, Site};

const LAYOUT: &str = r#"
<tree>
  <container name="a">
    <item name="file1" data="one"/>
    <item name="notes.txt" data="n"/>
  </container>
  <container name="b">
    <item name="file1" data="two"/>
  </container>
  <container name="list" ordered="true">
    <item name="k1"/>
    <item name="k2"/>
    <item name="k3"/>
  </container>
</tree>
"#;

fn session() -> Session {
    let tree = parse_layout(LAYOUT).expect("layout");
    Session::new(Site::with_defaults(tree, NamePolicy::Numbered, true), "tester")
}

#[test]
fn script_reports_each_command() {
    let script = parse_script(
        "# copy twice, then shuffle\n\
         copy /a/file1 /b file1\n\
         copy /a/file1 /b file1\n\
         move /a/notes.txt /b\n\
         rename /list k2 middle\n\
         mark copy /b/notes.txt\n\
         paste /a\n",
    )
    .unwrap();
    let mut session = session();

    let out = session.run(&script).expect("script runs");

    assert_eq!(
        out,
        vec![
            "copied /a/file1 -> /b/file1-2",
            "copied /a/file1 -> /b/file1-3",
            "moved /a/notes.txt -> /b/notes.txt",
            "renamed /list/k2 -> /list/middle",
            "marked 1 item(s) for copy; clipboard holds 1",
            "pasted 1 item(s) into /a: notes.txt",
        ]
    );
    let tree = &session.site.tree;
    let list = tree.resolve_path("/list").unwrap();
    assert_eq!(tree.keys(list).unwrap(), vec!["k1", "middle", "k3"]);
    assert_eq!(session.clipboards.peek("tester").len(), 1);
}

#[test]
fn show_renders_a_subtree() {
    let mut session = session();
    let script = parse_script("show /b").unwrap();
    let out = session.run(&script).unwrap();
    assert_eq!(out, vec!["b/\n  file1"]);
}

#[test]
fn failing_command_names_its_line() {
    let mut session = session();
    let script = parse_script("copy /a/file1 /b\n\nrename /a file1 notes.txt\n").unwrap();

    let err = session.run(&script).unwrap_err();

    let msg = format!("{err:#}");
    assert!(msg.contains("line 3"), "got {msg}");
    assert!(msg.contains("notes.txt is already in use"), "got {msg}");
}

#[test]
fn missing_paths_are_reported() {
    let mut session = session();
    let script = parse_script("move /nowhere /a").unwrap();
    let err = session.run(&script).unwrap_err();
    assert!(format!("{err:#}").contains("cannot resolve '/nowhere'"));
}

#[test]
fn outputs_before_a_failure_are_still_delivered() {
    let mut session = session();
    let script = parse_script("copy /a/file1 /b\nmove /nowhere /a\nclear\n").unwrap();
    let mut seen = Vec::new();

    let err = session.run_each(&script, |msg| seen.push(msg.to_string())).unwrap_err();

    assert!(format!("{err:#}").contains("line 2"));
    assert_eq!(seen, vec!["copied /a/file1 -> /b/file1-2"]);
    assert!(session.site.tree.resolve_path("/b/file1-2").is_ok());
}
