//! Build script for valvetimer-firmware
//!
//! - Sets up the linker search path for memory.x
//! - Emits linker arguments for cortex-m-rt and defmt
//! - Validates board.toml at compile time
//! - Generates board_config.rs constants from board.toml

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Start of the configuration sector (sector 5) in the address map
const CONFIG_SECTOR_ADDR: u64 = 0x0802_0000;

fn main() {
    check_memory_layout();
    setup_linker();
    let board = validate_config();
    generate_board_config(&board);
}

/// Copy memory.x to OUT_DIR and emit the linker scripts
///
/// memory.x stops FLASH at the configuration sector, so the image cannot
/// grow into the area erased by the config store.
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    if let Err(e) = fs::write(out_dir.join("memory.x"), include_bytes!("memory.x")) {
        panic!("Failed to write memory.x: {}", e);
    }
    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed=memory.x");

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Refuse a memory.x whose FLASH region reaches the configuration sector
fn check_memory_layout() {
    let memory_x = include_str!("memory.x");
    let region = memory_x
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with("FLASH"))
        .unwrap_or_else(|| panic!("memory.x has no FLASH region"));

    let origin = region_field(region, "ORIGIN")
        .and_then(parse_address)
        .unwrap_or_else(|| panic!("memory.x: cannot parse FLASH ORIGIN in '{}'", region));
    let length = region_field(region, "LENGTH")
        .and_then(parse_size)
        .unwrap_or_else(|| panic!("memory.x: cannot parse FLASH LENGTH in '{}'", region));

    if origin + length > CONFIG_SECTOR_ADDR {
        panic!(
            "memory.x: FLASH ends at {:#010x}, overlapping the configuration sector at {:#010x}",
            origin + length,
            CONFIG_SECTOR_ADDR
        );
    }
}

/// Value following `KEY =` in a MEMORY region line
fn region_field<'a>(region: &'a str, key: &str) -> Option<&'a str> {
    let rest = &region[region.find(key)? + key.len()..];
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let end = rest.find(|c: char| c == ',' || c.is_whitespace()).unwrap_or(rest.len());
    Some(&rest[..end])
}

fn parse_address(value: &str) -> Option<u64> {
    let hex = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X"))?;
    u64::from_str_radix(hex, 16).ok()
}

fn parse_size(value: &str) -> Option<u64> {
    if let Some(k) = value.strip_suffix('K') {
        k.parse::<u64>().ok().map(|k| k * 1024)
    } else if let Some(m) = value.strip_suffix('M') {
        m.parse::<u64>().ok().map(|m| m * 1024 * 1024)
    } else {
        parse_address(value).or_else(|| value.parse().ok())
    }
}

/// Board settings after validation
struct Board {
    active_level_high: bool,
    debounce_ms: u16,
    long_press_ms: u16,
    valve_inverted: bool,
    digit_period_us: u32,
}

/// Validate board.toml and extract its settings
fn validate_config() -> Board {
    println!("cargo:rerun-if-changed=board.toml");

    let config_path = Path::new("board.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: board.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a board.toml configuration file.          ║\n\
            ║  Please create one in the valvetimer-firmware directory.         ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read board.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in board.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    let mut errors = Vec::new();

    for section in ["button", "valve", "display"] {
        if !matches!(config.get(section), Some(toml::Value::Table(_))) {
            errors.push(format!("Missing [{}] section", section));
        }
    }

    let active_level_high = match lookup(&config, "button", "active_level") {
        Some(toml::Value::String(level)) if level == "high" => true,
        Some(toml::Value::String(level)) if level == "low" => false,
        Some(_) => {
            errors.push("[button] active_level must be 'high' or 'low'".to_string());
            true
        }
        None => {
            errors.push("[button] missing 'active_level'".to_string());
            true
        }
    };

    let debounce_ms = integer(&config, "button", "debounce_ms", 1, 1000, &mut errors);
    let long_press_ms = integer(&config, "button", "long_press_ms", 1, 65_535, &mut errors);
    if long_press_ms <= debounce_ms {
        errors.push("[button] long_press_ms must be greater than debounce_ms".to_string());
    }

    let valve_inverted = match lookup(&config, "valve", "inverted") {
        Some(toml::Value::Boolean(inverted)) => *inverted,
        Some(_) => {
            errors.push("[valve] inverted must be true or false".to_string());
            false
        }
        None => {
            errors.push("[valve] missing 'inverted'".to_string());
            false
        }
    };

    let digit_period_us = integer(&config, "display", "digit_period_us", 100, 10_000, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid board configuration                              ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=board.toml validated successfully");

    Board {
        active_level_high,
        debounce_ms: debounce_ms as u16,
        long_press_ms: long_press_ms as u16,
        valve_inverted,
        digit_period_us: digit_period_us as u32,
    }
}

fn lookup<'a>(config: &'a toml::Value, section: &str, key: &str) -> Option<&'a toml::Value> {
    config.get(section).and_then(|s| s.get(key))
}

/// Read an integer in `min..=max`, recording an error otherwise
fn integer(
    config: &toml::Value,
    section: &str,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) -> i64 {
    match lookup(config, section, key) {
        Some(toml::Value::Integer(value)) if (min..=max).contains(value) => *value,
        Some(toml::Value::Integer(_)) => {
            errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
            min
        }
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            min
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            min
        }
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write board_config.rs into OUT_DIR
fn generate_board_config(board: &Board) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    let source = format!(
        "// Generated from board.toml by build.rs\n\
         pub const ACTIVE_LEVEL_HIGH: bool = {};\n\
         pub const DEBOUNCE_MS: u16 = {};\n\
         pub const LONG_PRESS_MS: u16 = {};\n\
         pub const VALVE_INVERTED: bool = {};\n\
         pub const DIGIT_PERIOD_US: u32 = {};\n",
        board.active_level_high,
        board.debounce_ms,
        board.long_press_ms,
        board.valve_inverted,
        board.digit_period_us,
    );
    if let Err(e) = fs::write(out_dir.join("board_config.rs"), source) {
        panic!("Failed to write board_config.rs: {}", e);
    }
}
