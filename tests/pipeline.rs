//! End-to-end: scripted key transitions → observer → real FIFO → resolver
//! → recorded launches.

use clef::config::Config;
use clef::dispatch::{ActionDispatcher, Dispatch};
use clef::ipc::fifo::{open_reader, FifoWriter};
use clef::input::keymap::UsKeymap;
use clef::keys::{KeyCode, KeyEvent};
use clef::observer::Observer;
use clef::resolver::{self, ResolverStats};
use clef::shutdown::ShutdownToken;
use clef::traits::{InputSource, Launcher};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::path::Path;
use std::thread;
use std::time::Duration;

const LEFTCTRL: u16 = 29;
const LEFTSHIFT: u16 = 42;
const LEFTMETA: u16 = 125;
const KEY_W: u16 = 17;
const KEY_Q: u16 = 16;
const F3: u16 = 61;
const F5: u16 = 63;
const F9: u16 = 67;

const CONFIG: &str = r#"{
    "bindings": [
        { "keys": "F9", "command": ["guix", "shell", "--help"] },
        { "keys": "Control_L+F3", "command": ["echo", "Hello Keychording!"] },
        { "keys": "Super_L Shift_L w", "command": "alacritty" }
    ]
}"#;

fn down(code: u16) -> KeyEvent {
    KeyEvent::pressed(KeyCode::from_evdev(code))
}

fn up(code: u16) -> KeyEvent {
    KeyEvent::released(KeyCode::from_evdev(code))
}

/// Hands out one batch per poll and requests shutdown once empty.
struct Script {
    batches: VecDeque<Vec<KeyEvent>>,
    shutdown: ShutdownToken,
}

impl InputSource for Script {
    type Error = Infallible;

    fn poll_events(&mut self, _: Duration, out: &mut Vec<KeyEvent>) -> Result<(), Infallible> {
        match self.batches.pop_front() {
            Some(batch) => out.extend(batch),
            None => self.shutdown.trigger(),
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Recorder {
    calls: Vec<(String, Vec<String>)>,
}

impl Launcher for Recorder {
    fn launch(&mut self, program: &str, args: &[String]) -> std::io::Result<u32> {
        self.calls.push((program.to_string(), args.to_vec()));
        Ok(self.calls.len() as u32)
    }
}

/// Run the observer over `batches` into a FIFO at `path`, with the resolver
/// reading on another thread.  Returns what the resolver saw.
fn run_pipeline(path: &Path, batches: Vec<Vec<KeyEvent>>) -> (ResolverStats, Vec<(String, Vec<String>)>) {
    let table = Config::from_json(CONFIG).unwrap().binding_table().unwrap();

    let reader_path = path.to_path_buf();
    let resolver = thread::spawn(move || {
        let reader = open_reader(&reader_path).unwrap();
        let mut dispatcher = ActionDispatcher::new(table, Recorder::default());
        let stats = resolver::run(reader, &mut dispatcher).unwrap();
        (stats, dispatcher.launcher().calls.clone())
    });

    let shutdown = ShutdownToken::new();
    let mut writer = FifoWriter::connect(path, &shutdown).unwrap();
    let mut source = Script {
        batches: batches.into(),
        shutdown: shutdown.clone(),
    };
    let stats = Observer::new(UsKeymap, 16)
        .run(&mut source, &mut writer, &shutdown)
        .unwrap();
    assert_eq!(stats.dropped, 0);

    // Closing the write end is the resolver's end of stream.
    drop(writer);
    resolver.join().unwrap()
}

#[test]
fn chords_reach_their_commands() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chords.fifo");

    let (stats, calls) = run_pipeline(
        &path,
        vec![
            vec![down(F9), up(F9)],
            vec![down(LEFTCTRL), down(F3), up(F3), up(LEFTCTRL)],
            vec![down(LEFTSHIFT), down(LEFTMETA), down(KEY_W), up(KEY_W)],
            vec![up(LEFTMETA), up(LEFTSHIFT)],
        ],
    );

    assert_eq!(
        calls,
        vec![
            ("guix".to_string(), vec!["shell".to_string(), "--help".to_string()]),
            ("echo".to_string(), vec!["Hello Keychording!".to_string()]),
            ("alacritty".to_string(), vec![]),
        ]
    );
    assert_eq!(stats.launched, 3);
    assert_eq!(stats.unbound, 0);
    assert!(!path.exists(), "the writer removes the fifo when dropped");
}

#[test]
fn unbound_chords_cross_the_pipe_but_launch_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chords.fifo");

    let (stats, calls) = run_pipeline(
        &path,
        vec![
            vec![down(LEFTCTRL), down(KEY_Q), up(KEY_Q), up(LEFTCTRL)],
            vec![down(F5), up(F5)],
            vec![down(F9), up(F9)],
        ],
    );

    assert_eq!(stats.lines, 3);
    assert_eq!(stats.unbound, 2);
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "guix");
}

#[test]
fn modifier_only_sequences_send_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chords.fifo");

    let (stats, calls) = run_pipeline(
        &path,
        vec![vec![down(LEFTCTRL), down(LEFTSHIFT), up(LEFTSHIFT), up(LEFTCTRL)]],
    );

    assert_eq!(stats, ResolverStats::default());
    assert!(calls.is_empty());
}

#[test]
fn line_format_config_dispatches_like_json() {
    let config = Config::from_lines("# media\nF5 : firefox\nControl_L+F3 : echo hi\n").unwrap();
    let mut dispatcher = ActionDispatcher::new(config.binding_table().unwrap(), Recorder::default());

    assert!(matches!(dispatcher.dispatch("F5"), Dispatch::Launched { .. }));
    assert!(matches!(dispatcher.dispatch("Control_L F3"), Dispatch::Launched { .. }));
    assert_eq!(dispatcher.dispatch("F9"), Dispatch::Unbound);
    assert_eq!(dispatcher.launcher().calls[1], ("echo".to_string(), vec!["hi".to_string()]));
}
