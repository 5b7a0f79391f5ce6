// Note: Game Boy(TM) is a registered trademark of Nintendo CO., LTD. (C) 1989 to 1999 by Nintendo CO., LTD.
//
// A headless driver: loads a ROM (and optionally a boot ROM), runs it for a fixed number of
// frames, and prints the title plus a framebuffer checksum so a test harness can compare runs
// without a display attached.
use std::fs;

fn main() {
    rog::reg("gameboy");
    rog::reg("gameboy::cartridge");

    let mut rom_path = String::new();
    let mut boot_rom_path = String::new();
    let mut frames: u32 = 60;
    {
        let mut ap = argparse::ArgumentParser::new();
        ap.set_description("Gameboy emulator core (headless)");
        ap.refer(&mut boot_rom_path).add_option(
            &["-b", "--boot-rom"],
            argparse::Store,
            "Path to a boot ROM image to overlay at power-up",
        );
        ap.refer(&mut frames).add_option(&["-f", "--frames"], argparse::Store, "Number of frames to run");
        ap.refer(&mut rom_path).add_argument("rom", argparse::Store, "Path to the cartridge ROM image");
        ap.parse_args_or_exit();
    }

    let rom = fs::read(&rom_path).unwrap_or_else(|e| {
        rog::println!("failed to read rom {}: {}", rom_path, e);
        std::process::exit(1);
    });
    let boot_rom = if boot_rom_path.is_empty() {
        None
    } else {
        Some(fs::read(&boot_rom_path).unwrap_or_else(|e| {
            rog::println!("failed to read boot rom {}: {}", boot_rom_path, e);
            std::process::exit(1);
        }))
    };

    let mut mbrd = gameboy::motherboard::MotherBoard::power_up(rom, boot_rom);
    rog::debugln!("title: {}", mbrd.title());

    for _ in 0..frames {
        mbrd.step_frame();
    }

    let mut checksum: u64 = 0;
    for row in mbrd.framebuffer().iter() {
        for px in row.iter() {
            for c in px.iter() {
                checksum = checksum.wrapping_mul(31).wrapping_add(u64::from(*c));
            }
        }
    }
    println!("{} frames={} checksum={:016x}", mbrd.title(), frames, checksum);
}
