// src/eigen_print.rs

//! Terminal output for eigenvalues and tridiagonal forms.

use crate::tridiagonal::TridiagonalForm;
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Colour on a blue (smallest) to red (largest) ramp.
fn ramp_color(value: f64, min_value: f64, max_value: f64) -> Color {
    let intensity = if (max_value - min_value) != 0.0 {
        ((value - min_value) / (max_value - min_value)).clamp(0.0, 1.0)
    } else {
        0.0
    };
    Color::Rgb(
        (intensity * 255.0) as u8,
        0,
        ((1.0 - intensity) * 255.0) as u8,
    )
}

/// Prints one eigenvalue per line, coloured by its position in the spectrum.
pub fn print_eigenvalues(values: &[f64], color: ColorChoice) -> io::Result<()> {
    let stdout = StandardStream::stdout(color);
    let mut stdout = stdout.lock();
    write_eigenvalues(&mut stdout, values)
}

pub fn write_eigenvalues<W: WriteColor>(out: &mut W, values: &[f64]) -> io::Result<()> {
    if values.is_empty() {
        writeln!(out, "(no eigenvalues)")?;
        return Ok(());
    }

    let max_value = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min_value = values.iter().copied().fold(f64::INFINITY, f64::min);

    for (i, &value) in values.iter().enumerate() {
        let mut color_spec = ColorSpec::new();
        color_spec.set_fg(Some(ramp_color(value, min_value, max_value)));
        out.set_color(&color_spec)?;
        write!(out, "██")?;
        out.reset()?;
        writeln!(out, " λ{:<4} {:>22.15e}", i, value)?;
    }
    Ok(())
}

/// Prints the diagonal and sub-diagonal of a tridiagonal form.
pub fn print_tridiagonal(form: &TridiagonalForm, color: ColorChoice) -> io::Result<()> {
    let stdout = StandardStream::stdout(color);
    let mut stdout = stdout.lock();

    let mut header = ColorSpec::new();
    header.set_bold(true);

    stdout.set_color(&header)?;
    write!(stdout, "Diagonal (d):")?;
    stdout.reset()?;
    for value in form.diagonal() {
        write!(stdout, " {:.6}", value)?;
    }
    writeln!(stdout)?;

    stdout.set_color(&header)?;
    write!(stdout, "Subdiagonal (e):")?;
    stdout.reset()?;
    for value in form.off_diagonal() {
        write!(stdout, " {:.6}", value)?;
    }
    writeln!(stdout)?;
    Ok(())
}
