//! Tests for the synchronized printer

use std::io::{self, Write};
use std::sync::Arc;
use std::thread;

use dbgprint_core::printer::{stdout_printer, SyncPrinter};
use dbgprint_core::{dprint, tprint, Ansi, PrintError};

fn output(printer: SyncPrinter<Vec<u8>>) -> String
{
    String::from_utf8(printer.into_inner()).unwrap()
}

#[test]
fn test_print_no_color()
{
    let printer = SyncPrinter::new(Vec::new());
    printer.print("No color", None).unwrap();
    assert_eq!(output(printer), "No color\n");
}

#[test]
fn test_print_in_red()
{
    let printer = SyncPrinter::new(Vec::new());
    printer.print("In red", Some(Ansi::Red)).unwrap();
    assert_eq!(output(printer), "\x1b[1;31mIn red\x1b[1;37m\n");
}

#[test]
fn test_tprint_keeps_message_suffix()
{
    let printer = SyncPrinter::new(Vec::new());
    printer.tprint("No color", None).unwrap();
    let out = output(printer);
    assert_eq!(&out[out.len() - 9..], "No color\n");
    assert!(out.len() > "No color\n".len());
}

#[test]
fn test_tprint_colored_suffix()
{
    let printer = SyncPrinter::new(Vec::new());
    printer.tprint("In red", Some(Ansi::Red)).unwrap();
    let out = output(printer);
    assert!(out.starts_with("\x1b[1;31m"));
    assert!(out.ends_with(" In red\x1b[1;37m\n"));
}

#[test]
fn test_concurrent_lines_never_interleave()
{
    const WORKERS: usize = 8;
    const LINES: usize = 200;

    let printer = Arc::new(SyncPrinter::new(Vec::new()));
    let handles: Vec<_> = (0..WORKERS)
        .map(|worker| {
            let printer = Arc::clone(&printer);
            thread::spawn(move || {
                for line in 0..LINES {
                    printer
                        .print(&format!("worker {worker} line {line}"), Some(Ansi::Cyan))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let printer = Arc::try_unwrap(printer).unwrap();
    let out = output(printer);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), WORKERS * LINES);
    for line in lines {
        assert!(line.starts_with("\x1b[1;36mworker "), "mangled line: {line:?}");
        assert!(line.ends_with("\x1b[1;37m"), "mangled line: {line:?}");
        assert_eq!(line.matches("worker").count(), 1, "mangled line: {line:?}");
    }
}

/// Writer that refuses every write.
struct Broken;

impl Write for Broken
{
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize>
    {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()>
    {
        Ok(())
    }
}

#[test]
fn test_write_error_is_reported_and_lock_released()
{
    let printer = SyncPrinter::new(Broken);
    let err = printer.print("lost", None).unwrap_err();
    assert!(matches!(err, PrintError::Io(_)));
    assert!(err.to_string().contains("closed"));

    // The lock must be free again.
    assert!(printer.print("lost again", Some(Ansi::Red)).is_err());
    printer.with_writer(|_| ());
}

#[test]
fn test_stdout_helpers_do_not_panic()
{
    dprint("dprint to stdout", None);
    dprint("dprint to stdout in green", Some(Ansi::Green));
    tprint("tprint to stdout", Some(Ansi::Yellow));
}

#[test]
fn test_stdout_printer_is_shared()
{
    assert!(std::ptr::eq(stdout_printer(), stdout_printer()));
    assert!(stdout_printer().print("stdout_printer line", Some(Ansi::Cyan)).is_ok());
    assert!(stdout_printer().tprint("stdout_printer timestamped line", None).is_ok());
}
