use crate::types::StockBar;

const MAX_WIDTH: f64 = 80.0;

pub fn render_bar(stock_length: u32, bar: &StockBar) -> String {
    let scale = MAX_WIDTH / stock_length as f64;
    let grid_w = (stock_length as f64 * scale).round() as usize;
    if grid_w == 0 {
        return String::new();
    }

    let mut top = vec!['-'; grid_w + 1];
    let mut mid = vec![' '; grid_w + 1];
    let mut bottom = vec!['-'; grid_w + 1];

    // Segment edges at every cut boundary, plus the bar ends.
    let mut edges = vec![0usize];
    let mut segments: Vec<(usize, usize, String)> = Vec::new();
    let mut pos = 0u32;
    for cut in &bar.cuts {
        let start = (pos as f64 * scale).round() as usize;
        pos += cut.length;
        let end = (pos as f64 * scale).round() as usize;
        edges.push(end);
        segments.push((start, end, cut.label.clone()));
    }
    if bar.remaining_length > 0 {
        let start = (pos as f64 * scale).round() as usize;
        segments.push((start, grid_w, "fire".to_string()));
    }
    edges.push(grid_w);

    for &edge in &edges {
        top[edge] = '+';
        bottom[edge] = '+';
        mid[edge] = '|';
    }

    for (start, end, label) in segments {
        let width = end.saturating_sub(start);
        let chars: Vec<char> = label.chars().collect();
        if width <= chars.len() + 1 {
            continue;
        }
        let cx = start + width / 2;
        let begin = cx.saturating_sub(chars.len() / 2);
        for (i, &ch) in chars.iter().enumerate() {
            let x = begin + i;
            if x > start && x < end {
                mid[x] = ch;
            }
        }
    }

    let mut result = String::new();
    for row in [&top, &mid, &bottom] {
        let line: String = row.iter().collect();
        result.push_str(line.trim_end());
        result.push('\n');
    }
    result
}
