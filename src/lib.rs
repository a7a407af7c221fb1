///
/// ## Design
///
/// * the fixed 35-opcode machine only: 4K of RAM, sixteen byte registers,
///   a sixteen-frame call stack and the 64x32 XOR frame
/// * COSMAC VIP quirks throughout: the logic ops clear the flag, shifts
///   read VY, spill/fill move I, flag writes land after value writes
/// * one instruction per 2ms frame; the 60Hz timers tick off their own
///   accumulators, so instruction pace never bends them
/// * program faults (stack, memory) halt the machine with a reason rather
///   than erroring out; `Err` is reserved for the host side
/// * display, input and sound sit behind traits so the terminal frontend
///   can be swapped for another; each has an inert implementation for
///   testing the interpreter without a terminal
/// * Fx0A arms on a fresh press and delivers on its release, like the VIP
///   keypad routine it stands in for
pub mod display;
pub mod error;
pub mod framebuffer;
pub mod input;
pub mod interpreter;
pub mod keypad;
pub mod memory;
pub mod sound;
pub mod timer;
