use std::fmt::Write;

use crate::types::{OptimizationResult, StockBar, WeldAssembly};

// 1mm = 0.1 drawing units, the usual 1:10 shop-drawing scale.
const SCALE: f64 = 0.1;
const MARGIN: f64 = 50.0;
const BAR_HEIGHT: f64 = 30.0;
const ROW_SPACING: f64 = 100.0;
const TEXT_HEIGHT: f64 = 20.0;

// Layer name, ACI color.
const LAYERS: &[(&str, u32)] = &[
    ("BARS", 7),
    ("PIECES", 5),
    ("LABELS", 2),
    ("DIMS", 8),
    ("CUTS", 1),
    ("OFFCUTS", 3),
    ("WELDS", 6),
    ("SUMMARY", 7),
];

/// Renders the plan as a DXF document: one row per stock bar, then the
/// weld assemblies, the leftover offcuts, and a summary block.
pub fn export(result: &OptimizationResult, stock_length: u32) -> String {
    let mut out = String::new();

    out.push_str("0\nSECTION\n2\nHEADER\n9\n$ACADVER\n1\nAC1009\n0\nENDSEC\n");
    layer_table(&mut out);
    out.push_str("0\nSECTION\n2\nENTITIES\n");

    let mut y = MARGIN;
    for (index, bar) in result.stock_bars.iter().enumerate() {
        draw_bar(&mut out, bar, index, y, stock_length);
        y += ROW_SPACING;
    }

    if !result.weld_assemblies.is_empty() {
        y += ROW_SPACING;
        text(&mut out, "WELDED PIECES", MARGIN, y, TEXT_HEIGHT, "SUMMARY");
        y += ROW_SPACING / 2.0;
        for weld in &result.weld_assemblies {
            draw_weld(&mut out, weld, y);
            y += ROW_SPACING;
        }
    }

    if !result.offcuts.is_empty() {
        y += ROW_SPACING;
        text(&mut out, "OFFCUTS", MARGIN, y, TEXT_HEIGHT, "SUMMARY");
        y += ROW_SPACING / 2.0;
        for offcut in &result.offcuts {
            let width = offcut.length as f64 * SCALE;
            rectangle(&mut out, MARGIN, y, width, BAR_HEIGHT, "OFFCUTS");
            text(
                &mut out,
                &format!("{} {}mm (bar {})", offcut.name, offcut.length, offcut.source_bar_index + 1),
                MARGIN + width + 20.0,
                y + BAR_HEIGHT / 2.0,
                TEXT_HEIGHT * 0.6,
                "LABELS",
            );
            y += BAR_HEIGHT * 2.0;
        }
    }

    y += ROW_SPACING;
    let summary = [
        format!("STOCK BARS: {}", result.total_stock_bars),
        format!("WELDED PIECES: {}", result.weld_assemblies.len()),
        format!("UTILIZATION: {}%", result.material_utilization_percent),
    ];
    for line in &summary {
        text(&mut out, line, MARGIN, y, TEXT_HEIGHT * 0.8, "SUMMARY");
        y += TEXT_HEIGHT * 2.0;
    }

    out.push_str("0\nENDSEC\n0\nEOF\n");
    out
}

fn layer_table(out: &mut String) {
    let _ = write!(
        out,
        "0\nSECTION\n2\nTABLES\n0\nTABLE\n2\nLAYER\n70\n{}\n",
        LAYERS.len()
    );
    for (name, color) in LAYERS {
        let _ = write!(
            out,
            "0\nLAYER\n2\n{name}\n70\n0\n62\n{color}\n6\nCONTINUOUS\n"
        );
    }
    out.push_str("0\nENDTAB\n0\nENDSEC\n");
}

fn draw_bar(out: &mut String, bar: &StockBar, index: usize, y: f64, stock_length: u32) {
    let bar_width = stock_length as f64 * SCALE;
    rectangle(out, MARGIN, y, bar_width, BAR_HEIGHT, "BARS");
    text(
        out,
        &format!("BAR #{}", index + 1),
        MARGIN,
        y - TEXT_HEIGHT * 1.25,
        TEXT_HEIGHT,
        "LABELS",
    );

    let mut x = MARGIN;
    for (cut_index, cut) in bar.cuts.iter().enumerate() {
        let cut_width = cut.length as f64 * SCALE;
        rectangle(out, x, y, cut_width, BAR_HEIGHT, "PIECES");
        let label_x = x + cut_width / 2.0;
        let label_y = y + BAR_HEIGHT / 2.0;
        text(out, &cut.label, label_x, label_y, TEXT_HEIGHT * 0.6, "LABELS");
        text(
            out,
            &format!("{}mm", cut.length),
            label_x,
            label_y - 15.0,
            TEXT_HEIGHT * 0.5,
            "DIMS",
        );
        if cut_index < bar.cuts.len() - 1 {
            line(out, x + cut_width, y, x + cut_width, y + BAR_HEIGHT, "CUTS");
        }
        x += cut_width;
    }

    if bar.remaining_length > 0 {
        let fire_width = bar.remaining_length as f64 * SCALE;
        rectangle(out, x, y, fire_width, BAR_HEIGHT, "OFFCUTS");
        text(
            out,
            &format!("FIRE {}mm", bar.remaining_length),
            x + fire_width / 2.0,
            y + BAR_HEIGHT / 2.0,
            TEXT_HEIGHT * 0.5,
            "DIMS",
        );
    }
}

fn draw_weld(out: &mut String, weld: &WeldAssembly, y: f64) {
    text(
        out,
        &format!(
            "{} = {}mm (target {}mm, delta {:+}mm)",
            weld.label, weld.actual_length, weld.target_length, weld.tolerance_delta
        ),
        MARGIN,
        y - TEXT_HEIGHT * 1.25,
        TEXT_HEIGHT * 0.7,
        "LABELS",
    );

    let mut x = MARGIN;
    for (piece_index, piece) in weld.pieces.iter().enumerate() {
        let piece_width = piece.length as f64 * SCALE;
        rectangle(out, x, y, piece_width, BAR_HEIGHT, "PIECES");
        text(
            out,
            &format!("{} {}mm", piece.name, piece.length),
            x + piece_width / 2.0,
            y + BAR_HEIGHT / 2.0,
            TEXT_HEIGHT * 0.5,
            "DIMS",
        );
        if piece_index < weld.pieces.len() - 1 {
            // Weld seam between adjacent pieces.
            line(out, x + piece_width, y - 5.0, x + piece_width, y + BAR_HEIGHT + 5.0, "WELDS");
        }
        x += piece_width;
    }
}

fn rectangle(out: &mut String, x: f64, y: f64, width: f64, height: f64, layer: &str) {
    let _ = write!(
        out,
        "0\nLWPOLYLINE\n8\n{layer}\n90\n5\n70\n1\n10\n{x}\n20\n{y}\n10\n{x2}\n20\n{y}\n10\n{x2}\n20\n{y2}\n10\n{x}\n20\n{y2}\n10\n{x}\n20\n{y}\n",
        x2 = x + width,
        y2 = y + height,
    );
}

fn line(out: &mut String, x1: f64, y1: f64, x2: f64, y2: f64, layer: &str) {
    let _ = write!(
        out,
        "0\nLINE\n8\n{layer}\n10\n{x1}\n20\n{y1}\n11\n{x2}\n21\n{y2}\n"
    );
}

fn text(out: &mut String, value: &str, x: f64, y: f64, height: f64, layer: &str) {
    let _ = write!(
        out,
        "0\nTEXT\n8\n{layer}\n10\n{x}\n20\n{y}\n40\n{height}\n1\n{value}\n"
    );
}
