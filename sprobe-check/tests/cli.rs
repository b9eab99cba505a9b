use std::io::{Read, Write};
use std::net::TcpListener;
use std::process::{Command, Output, Stdio};
use std::sync::mpsc;
use std::thread;

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_check_sentinel"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run check_sentinel")
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn bad_port_is_unknown_on_one_line() {
    let output = run(&["-p", "abc"]);
    assert_eq!(output.status.code(), Some(3));

    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 1, "stdout: {:?}", lines);
    assert!(lines[0].starts_with("UNKNOWN - "), "stdout: {:?}", lines);
    assert!(!lines[0].contains("error: "));
    assert!(!lines[0].contains("Usage"));
}

#[test]
fn unknown_flag_is_unknown() {
    let output = run(&["--bogus"]);
    assert_eq!(output.status.code(), Some(3));
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("UNKNOWN - "));
}

#[test]
fn missing_config_file_reports_cause_once() {
    let path = "/nonexistent/check_sentinel.toml";
    let cause = std::fs::read_to_string(path).unwrap_err().to_string();

    let output = run(&["-c", path]);
    assert_eq!(output.status.code(), Some(3));

    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("UNKNOWN - invalid configuration: failed to read config file"));
    assert!(lines[0].contains(path));
    assert_eq!(lines[0].matches(cause.as_str()).count(), 1, "stdout: {}", lines[0]);
}

#[test]
fn help_exits_zero() {
    let output = run(&["--help"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("--host"));
}

#[test]
fn refused_port_is_critical() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port().to_string();
    drop(listener);

    let output = run(&["-H", "127.0.0.1", "-p", &port, "-t", "2"]);
    assert_eq!(output.status.code(), Some(2));

    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 1, "stdout: {:?}", lines);
    assert!(lines[0].starts_with(&format!("CRITICAL - Error connecting to 127.0.0.1:{}", port)));
    assert!(output.stderr.is_empty(), "logging is off by default");
}

#[test]
fn closed_stdout_keeps_exit_code() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port().to_string();
    let (release, released) = mpsc::channel::<()>();
    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let mut buf = [0u8; 64];
        let _ = stream.read(&mut buf);
        // Hold the reply until the reader of stdout is gone.
        released.recv().expect("release");
        let report = "sentinel_masters:1\r\nsentinel_tilt:0\r\n";
        let frame = format!("${}\r\n{}\r\n", report.len(), report);
        let _ = stream.write_all(frame.as_bytes());
    });

    let mut child = Command::new(env!("CARGO_BIN_EXE_check_sentinel"))
        .args(["-p", &port, "-t", "5"])
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn check_sentinel");
    drop(child.stdout.take());
    release.send(()).expect("release server");

    let output = child.wait_with_output().expect("wait");
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stderr.is_empty(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    server.join().expect("server thread");
}
