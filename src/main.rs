use std::collections::HashSet;
use std::path::PathBuf;

use bar_optimizer::solver::Solver;
use bar_optimizer::types::{OptimizerConfig, PartRequest};
use bar_optimizer::{dxf, render};
use clap::Parser;

#[derive(Parser)]
#[command(
    name = "bar_optimizer",
    about = "1D bar cutting optimizer with offcut welding"
)]
struct Cli {
    /// Stock bar length in mm
    #[arg(long, default_value_t = 12000)]
    stock_length: u32,

    /// Parts as POS:LENGTHxQTY (e.g. P1:7500x3)
    #[arg(long = "parts", num_args = 1..)]
    parts: Vec<String>,

    /// Bulk part list file, one "POS LENGTH [QTY]" per line
    #[arg(long)]
    bulk: Option<PathBuf>,

    /// Material lost per weld seam in mm
    #[arg(long, default_value_t = 10)]
    weld_loss: u32,

    /// Minimum reusable offcut length in mm
    #[arg(long, default_value_t = 100)]
    min_fire: u32,

    /// Show ASCII layout of each bar
    #[arg(long)]
    layout: bool,

    /// Write the cutting diagram to a DXF file
    #[arg(long)]
    dxf: Option<PathBuf>,
}

fn parse_part(s: &str) -> Result<PartRequest, String> {
    let (position, rest) = s
        .split_once(':')
        .ok_or_else(|| format!("invalid part '{}', expected POS:LENGTHxQTY", s))?;
    if position.is_empty() {
        return Err(format!("invalid part '{}', empty position", s));
    }
    let (length, quantity) = match rest.split_once('x') {
        Some((length, quantity)) => (length, quantity),
        None => (rest, "1"),
    };
    let length = length
        .parse::<u32>()
        .map_err(|_| format!("invalid length in '{}'", s))?;
    let quantity = quantity
        .parse::<u32>()
        .map_err(|_| format!("invalid quantity in '{}'", s))?;
    if length == 0 || quantity == 0 {
        return Err(format!("length and quantity must be non-zero in '{}'", s));
    }
    Ok(PartRequest {
        position: position.to_string(),
        length,
        quantity,
    })
}

fn parse_bulk(contents: &str) -> Result<Vec<PartRequest>, String> {
    let mut requests = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 2 || fields.len() > 3 {
            return Err(format!(
                "line {}: invalid format '{}', expected POS LENGTH [QTY]",
                index + 1,
                line
            ));
        }
        let length = fields[1]
            .parse::<u32>()
            .map_err(|_| format!("line {}: invalid length '{}'", index + 1, fields[1]))?;
        let quantity = match fields.get(2) {
            Some(raw) => raw
                .parse::<u32>()
                .map_err(|_| format!("line {}: invalid quantity '{}'", index + 1, raw))?,
            None => 1,
        };
        if length == 0 || quantity == 0 {
            return Err(format!(
                "line {}: length and quantity must be non-zero",
                index + 1
            ));
        }
        requests.push(PartRequest {
            position: fields[0].to_string(),
            length,
            quantity,
        });
    }
    Ok(requests)
}

fn check_unique_positions(requests: &[PartRequest]) -> Result<(), String> {
    let mut seen = HashSet::new();
    for request in requests {
        if !seen.insert(request.position.as_str()) {
            return Err(format!("duplicate position '{}'", request.position));
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let mut requests: Vec<PartRequest> = cli
        .parts
        .iter()
        .map(|p| parse_part(p))
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });

    if let Some(path) = &cli.bulk {
        let contents = std::fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("Error: cannot read {}: {}", path.display(), e);
            std::process::exit(1);
        });
        let bulk = parse_bulk(&contents).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });
        requests.extend(bulk);
    }

    if let Err(e) = check_unique_positions(&requests) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let config = OptimizerConfig {
        stock_length: cli.stock_length,
        weld_loss: cli.weld_loss,
        min_fire_length: cli.min_fire,
    };

    let result = Solver::new(config, requests).solve().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    for bar in &result.stock_bars {
        println!(
            "Bar #{} ({}% used, {}mm left):",
            bar.id, bar.efficiency_percent, bar.remaining_length
        );
        for cut in &bar.cuts {
            println!("  {}", cut);
        }
        if cli.layout {
            print!("{}", render::render_bar(config.stock_length, bar));
        }
        println!();
    }

    for weld in &result.weld_assemblies {
        let pieces = weld
            .pieces
            .iter()
            .map(|p| format!("{} ({}mm)", p.name, p.length))
            .collect::<Vec<_>>()
            .join(" + ");
        println!(
            "Weld {}: {} = {}mm (target {}mm, delta {:+}mm)",
            weld.label, pieces, weld.actual_length, weld.target_length, weld.tolerance_delta
        );
    }

    if !result.offcuts.is_empty() {
        let offcuts = result
            .offcuts
            .iter()
            .map(|o| format!("{} ({}mm, bar {})", o.name, o.length, o.source_bar_index + 1))
            .collect::<Vec<_>>()
            .join(", ");
        println!("Offcuts: {}", offcuts);
    }

    println!(
        "Summary: {} bar{} used, {} weld{}, {}% material utilization",
        result.total_stock_bars,
        if result.total_stock_bars == 1 { "" } else { "s" },
        result.weld_assemblies.len(),
        if result.weld_assemblies.len() == 1 { "" } else { "s" },
        result.material_utilization_percent,
    );

    if let Some(path) = &cli.dxf {
        std::fs::write(path, dxf::export(&result, config.stock_length)).unwrap_or_else(|e| {
            eprintln!("Error: cannot write {}: {}", path.display(), e);
            std::process::exit(1);
        });
        println!("Cutting diagram written to {}", path.display());
    }
}
