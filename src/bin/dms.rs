/// Interactive DMS console application

use dmspacker::*;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use std::io::{IsTerminal, Write};
use std::path::Path;
use std::time::UNIX_EPOCH;

/// Command completer for the REPL
struct CommandCompleter {
    commands: Vec<&'static str>,
}

impl CommandCompleter {
    fn new() -> Self {
        Self {
            commands: vec![
                "banner", "exit", "fileid", "help", "hex", "info", "load", "open", "pack",
                "quit", "tracks", "unpack",
            ],
        }
    }
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        // Only complete the first word (command name)
        let line_to_cursor = &line[..pos];
        if line_to_cursor.contains(' ') {
            return Ok((pos, vec![]));
        }

        let prefix = line_to_cursor.to_lowercase();
        let matches: Vec<Pair> = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(&prefix))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();

        Ok((0, matches))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}
impl Validator for CommandCompleter {}
impl Helper for CommandCompleter {}

/// Get the path to the history file
fn history_path() -> Option<std::path::PathBuf> {
    dirs::home_dir().map(|mut p| {
        p.push(".dmspacker_history");
        p
    })
}

/// What the console currently has loaded
enum Loaded {
    /// A raw ADF image waiting to be packed
    Adf {
        data: Vec<u8>,
        name: String,
        mtime: Option<u32>,
    },
    /// A parsed and verified DMS archive
    Archive(DmsArchive),
}

fn main() {
    println!("=== DMSPacker ===");
    println!("Interactive console for packing ADF disk images into DMS archives.");
    println!("Type 'help' for available commands\n");

    let mut rl = Editor::new().expect("Failed to create editor");
    rl.set_helper(Some(CommandCompleter::new()));

    // Load history if available
    if let Some(history_path) = history_path() {
        let _ = rl.load_history(&history_path);
    }

    let mut loaded: Option<Loaded> = None;
    let mut banner: Option<Vec<u8>> = None;
    let mut file_id: Option<Vec<u8>> = None;

    loop {
        let readline = rl.readline("> ");
        let input = match readline {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                if let Some(history_path) = history_path() {
                    let _ = rl.save_history(&history_path);
                }
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        };

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let _ = rl.add_history_entry(input);

        let parts = parse_command_line(input);
        if parts.is_empty() {
            continue;
        }
        let command = parts[0].to_lowercase();

        match command.as_str() {
            "help" => {
                print_help();
            }
            "quit" | "exit" => {
                if let Some(history_path) = history_path() {
                    let _ = rl.save_history(&history_path);
                }
                println!("Goodbye!");
                break;
            }
            "open" | "load" => {
                if parts.len() < 2 {
                    println!("Usage: open <path>");
                    continue;
                }
                match open_file(&parts[1]) {
                    Ok(opened) => {
                        match &opened {
                            Loaded::Adf { data, name, .. } => {
                                println!(
                                    "Opened ADF image: {} ({} tracks, {} bytes)",
                                    name,
                                    data.len() / format::TRACK_LENGTH,
                                    data.len()
                                );
                            }
                            Loaded::Archive(archive) => {
                                println!(
                                    "Opened DMS archive: {} ({} tracks, all checks passed)",
                                    parts[1],
                                    archive.track_count()
                                );
                            }
                        }
                        loaded = Some(opened);
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            "info" => match &loaded {
                Some(Loaded::Adf { data, name, .. }) => {
                    println!("ADF image: {}", name);
                    println!("Size: {} bytes", data.len());
                    println!("Tracks: {}", data.len() / format::TRACK_LENGTH);
                }
                Some(Loaded::Archive(archive)) => print_info(archive),
                None => println!("Nothing loaded. Use 'open <path>' first."),
            },
            "tracks" => match &loaded {
                Some(Loaded::Archive(archive)) => list_tracks(archive),
                Some(Loaded::Adf { data, .. }) => {
                    println!(
                        "Raw image: {} tracks of {} bytes (pack it to see per-track sizes)",
                        data.len() / format::TRACK_LENGTH,
                        format::TRACK_LENGTH
                    );
                }
                None => println!("Nothing loaded."),
            },
            "hex" => {
                if parts.len() < 2 {
                    println!("Usage: hex <track> [max_bytes]");
                    continue;
                }
                let number: u16 = match parts[1].parse() {
                    Ok(n) => n,
                    Err(_) => {
                        println!("Invalid track number: {}", parts[1]);
                        continue;
                    }
                };
                let max_bytes = parts
                    .get(2)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(256usize);

                match &loaded {
                    Some(Loaded::Archive(archive)) => match archive.get_track(number) {
                        Some(track) => {
                            println!("Track {} ({} bytes):", number, track.len());
                            print_hex_dump(track.data(), max_bytes);
                        }
                        None => println!("No track {} in archive", number),
                    },
                    Some(Loaded::Adf { data, .. }) => {
                        let start = number as usize * format::TRACK_LENGTH;
                        if start + format::TRACK_LENGTH <= data.len() {
                            println!("Track {} ({} bytes):", number, format::TRACK_LENGTH);
                            print_hex_dump(&data[start..start + format::TRACK_LENGTH], max_bytes);
                        } else {
                            println!("No track {} in image", number);
                        }
                    }
                    None => println!("Nothing loaded."),
                }
            }
            "banner" => {
                if parts.len() < 2 {
                    match &loaded {
                        Some(Loaded::Archive(archive)) => match archive.banner() {
                            Some(text) => println!("{}", String::from_utf8_lossy(text)),
                            None => println!("Archive has no banner."),
                        },
                        _ => match &banner {
                            Some(text) => {
                                println!("Pending banner: {} bytes", text.len());
                            }
                            None => println!("Usage: banner <path> (attach before packing)"),
                        },
                    }
                    continue;
                }
                match std::fs::read(&parts[1]) {
                    Ok(text) => {
                        println!("Banner attached: {} bytes", text.len());
                        banner = Some(text);
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            "fileid" => {
                if parts.len() < 2 {
                    match &loaded {
                        Some(Loaded::Archive(archive)) => match archive.file_id() {
                            Some(text) => println!("{}", String::from_utf8_lossy(text)),
                            None => println!("Archive has no FILE_ID.DIZ."),
                        },
                        _ => match &file_id {
                            Some(text) => {
                                println!("Pending FILE_ID.DIZ: {} bytes", text.len());
                            }
                            None => println!("Usage: fileid <path> (attach before packing)"),
                        },
                    }
                    continue;
                }
                match std::fs::read(&parts[1]) {
                    Ok(text) => {
                        println!("FILE_ID.DIZ attached: {} bytes", text.len());
                        file_id = Some(text);
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            "pack" => {
                let Some(Loaded::Adf { data, mtime, .. }) = &loaded else {
                    println!("No ADF image loaded. Use 'open <path>' first.");
                    continue;
                };
                if parts.len() < 2 {
                    println!("Usage: pack <output.dms | -> [-0] [-f]");
                    continue;
                }

                let store = parts.iter().any(|p| p == "-0");
                let force = parts.iter().any(|p| p == "-f");

                let mut options = if store {
                    PackOptions::store()
                } else {
                    PackOptions::new(Cmode::Simple)
                };
                if let Some(text) = &banner {
                    options = options.with_banner(text.clone());
                }
                if let Some(text) = &file_id {
                    options = options.with_file_id(text.clone());
                }
                if let Some(mtime) = mtime {
                    options = options.with_date(*mtime);
                }

                if parts[1] == "-" {
                    if std::io::stdout().is_terminal() {
                        println!("Cowardly refusing to write binary data to a terminal");
                        continue;
                    }
                    match pack_archive(data, &options) {
                        Ok(archive) => {
                            if let Err(e) = std::io::stdout().write_all(&archive) {
                                println!("Error: {}", e);
                            }
                        }
                        Err(e) => println!("Error: {}", e),
                    }
                    continue;
                }

                if Path::new(&parts[1]).exists() && !force {
                    println!("{} already exists (use -f to overwrite)", parts[1]);
                    continue;
                }
                match write_dms(data, &options, &parts[1]) {
                    Ok(()) => {
                        let packed = std::fs::metadata(&parts[1]).map(|m| m.len()).unwrap_or(0);
                        println!(
                            "Packed {} bytes into {} ({} bytes)",
                            data.len(),
                            parts[1],
                            packed
                        );
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            "unpack" => {
                let Some(Loaded::Archive(archive)) = &loaded else {
                    println!("No DMS archive loaded. Use 'open <path>' first.");
                    continue;
                };
                if parts.len() < 2 {
                    println!("Usage: unpack <output.adf> [-f]");
                    continue;
                }
                let force = parts.iter().any(|p| p == "-f");
                if Path::new(&parts[1]).exists() && !force {
                    println!("{} already exists (use -f to overwrite)", parts[1]);
                    continue;
                }

                let adf = archive.to_adf();
                match std::fs::write(&parts[1], &adf) {
                    Ok(()) => println!("Unpacked {} bytes into {}", adf.len(), parts[1]),
                    Err(e) => println!("Error: {}", e),
                }
            }
            _ => {
                println!(
                    "Unknown command: {}. Type 'help' for available commands.",
                    command
                );
            }
        }
    }
}

/// Open either a DMS archive or a raw ADF image, detected by signature
fn open_file(path: &str) -> Result<Loaded> {
    let bytes = std::fs::read(path)?;

    if is_archive(&bytes) {
        let archive = read_dms(path)?;
        return Ok(Loaded::Archive(archive));
    }

    if bytes.is_empty() || bytes.len() % format::TRACK_LENGTH != 0 {
        return Err(DmsError::invalid_format(format!(
            "{} is neither a DMS archive nor a whole number of {} byte tracks",
            path,
            format::TRACK_LENGTH
        )));
    }

    let mtime = std::fs::metadata(path)
        .ok()
        .and_then(|meta| meta.modified().ok())
        .and_then(|modified| modified.duration_since(UNIX_EPOCH).ok())
        .map(|duration| duration.as_secs() as u32);

    Ok(Loaded::Adf {
        data: bytes,
        name: path.to_string(),
        mtime,
    })
}

fn parse_command_line(input: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in input.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
            }
            ' ' | '\t' if !in_quotes => {
                if !current.is_empty() {
                    parts.push(current.clone());
                    current.clear();
                }
            }
            _ => {
                current.push(ch);
            }
        }
    }

    if !current.is_empty() {
        parts.push(current);
    }

    parts
}

fn print_help() {
    println!("Available commands:");
    println!("  open <path>              - Open an ADF image or DMS archive (detected by signature)");
    println!("  info                     - Show image or archive information");
    println!("  tracks                   - List tracks with packed sizes and modes");
    println!("  hex <track> [max]        - Hex dump a track (default 256 bytes)");
    println!("  banner [path]            - Attach a banner, or show the loaded archive's banner");
    println!("  fileid [path]            - Attach a FILE_ID.DIZ, or show the loaded archive's");
    println!("  pack <path|-> [-0] [-f]  - Pack the loaded ADF into a DMS archive");
    println!("                             (-0 stores tracks uncompressed, -f overwrites,");
    println!("                              '-' writes to standard output)");
    println!("  unpack <path> [-f]       - Write the loaded archive back out as an ADF image");
    println!("  help                     - Show this help");
    println!("  quit, exit               - Exit");
}

fn print_info(archive: &DmsArchive) {
    let header = archive.header();
    if let Some(filename) = archive.filename() {
        println!("Filename: {}", filename);
    }
    println!("Info bits: {}", header.info_bits);
    println!("Date: {} (unix seconds)", header.date);
    println!(
        "Tracks: {} ({}..{})",
        header.track_count(),
        header.low_track,
        header.high_track
    );
    println!("Total packed: {} bytes", header.total_packed);
    println!("Total unpacked: {} bytes", header.total_unpacked);
    println!("Compression: {}", header.cmode.name());
    println!(
        "Creator version: {}.{:02}",
        header.creator_version / 100,
        header.creator_version % 100
    );
    println!(
        "Needed version: {}.{:02}",
        header.needed_version / 100,
        header.needed_version % 100
    );
    println!("Time to create: {} seconds", header.time_elapsed);
    println!(
        "Banner: {}",
        if archive.banner().is_some() {
            "Yes"
        } else {
            "No"
        }
    );
    println!(
        "FILE_ID.DIZ: {}",
        if archive.file_id().is_some() {
            "Yes"
        } else {
            "No"
        }
    );
}

fn list_tracks(archive: &DmsArchive) {
    println!(
        "{:<8} {:<8} {:<10} {:<8}",
        "Track", "Mode", "Packed", "Unpacked"
    );
    println!("{}", "-".repeat(38));

    for track in archive.tracks() {
        println!(
            "{:<8} {:<8} {:<10} {:<8}",
            track.number,
            track.cmode.name(),
            track.packed_length,
            track.len()
        );
    }
}

fn print_hex_dump(data: &[u8], max_bytes: usize) {
    let len = data.len().min(max_bytes);

    for (i, chunk) in data[..len].chunks(16).enumerate() {
        print!("{:04X}: ", i * 16);

        // Print hex
        for (j, byte) in chunk.iter().enumerate() {
            print!("{:02X} ", byte);
            if j == 7 {
                print!(" ");
            }
        }

        // Pad if less than 16 bytes
        for j in chunk.len()..16 {
            print!("   ");
            if j == 7 {
                print!(" ");
            }
        }

        print!(" |");

        // Print ASCII
        for byte in chunk {
            let c = if *byte >= 32 && *byte < 127 {
                *byte as char
            } else {
                '.'
            };
            print!("{}", c);
        }

        println!("|");
    }

    if data.len() > max_bytes {
        println!("... ({} more bytes)", data.len() - max_bytes);
    }
}
