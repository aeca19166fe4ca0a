use tracing::debug;

use crate::config::CardParams;
use crate::models::{CardCandidate, CardSelection, Contour, RotatedRect};

/// Pick the single best card rectangle out of a contour set.
///
/// Candidates are simplified contours with a plausible vertex count whose
/// fitted rectangle covers a plausible share of `image_area`. They are ranked
/// by area; the first of the top `top_k` inside the aspect band wins, else the
/// largest candidate is taken as a fallback. Equal areas keep extraction
/// order, so the result depends only on the inputs.
pub fn select_card(contours: &[Contour], image_area: f64, params: &CardParams) -> CardSelection {
    let min_area = image_area * params.min_area_fraction;
    let max_area = image_area * params.max_area_fraction;

    let mut candidates = Vec::new();
    for (index, contour) in contours.iter().enumerate() {
        let approx = contour.simplify(params.approx_epsilon_fraction);
        let Some(rect) = RotatedRect::fit(&approx) else {
            debug!(contour = index, vertices = approx.len(), "contour too small to fit a rectangle");
            continue;
        };
        let area = rect.area();
        debug!(contour = index, area, vertices = approx.len(), "contour");

        let vertices_ok = (params.min_vertices..=params.max_vertices).contains(&approx.len());
        if vertices_ok && area > min_area && area < max_area {
            candidates.push(CardCandidate {
                contour_index: index,
                vertices: approx.len(),
                rect,
            });
        }
    }

    // Stable sort: equal areas stay in extraction order.
    candidates.sort_by(|a, b| b.rect.area().total_cmp(&a.rect.area()));

    debug!(count = candidates.len(), "rectangular contours");
    for (rank, candidate) in candidates.iter().take(params.report_top).enumerate() {
        debug!(
            rank,
            area = candidate.rect.area(),
            aspect_ratio = candidate.rect.aspect_ratio(),
            "ranked candidate"
        );
    }

    let card_like = candidates
        .iter()
        .take(params.top_k)
        .enumerate()
        .find(|(_, c)| in_band(c.rect.aspect_ratio(), params.min_aspect, params.max_aspect));

    if let Some((rank, candidate)) = card_like {
        debug!(rank, "selected candidate with card-like aspect ratio");
        log_selected(&candidate.rect);
        return CardSelection::Found(*candidate);
    }

    if let Some(largest) = candidates.first() {
        debug!("fallback: selected largest candidate");
        log_selected(&largest.rect);
        return CardSelection::FoundByFallback(*largest);
    }

    debug!("no rectangle with correct aspect ratio and area found");
    let rejected = largest_contours(contours, params.report_top);
    for (i, rect) in rejected.iter().enumerate() {
        debug!(
            rank = i,
            area = rect.area(),
            long_side = rect.long_side(),
            short_side = rect.short_side(),
            aspect_ratio = rect.aspect_ratio(),
            "top rejected contour"
        );
    }
    CardSelection::NotFound { rejected }
}

/// Inclusive band check.
pub fn in_band(value: f64, min: f64, max: f64) -> bool {
    value >= min && value <= max
}

/// Rectangles of the `n` largest raw contours, for diagnostics.
fn largest_contours(contours: &[Contour], n: usize) -> Vec<RotatedRect> {
    let mut rects: Vec<RotatedRect> = contours.iter().filter_map(Contour::min_area_rect).collect();
    rects.sort_by(|a, b| b.area().total_cmp(&a.area()));
    rects.truncate(n);
    rects
}

fn log_selected(rect: &RotatedRect) {
    debug!(
        area = rect.area(),
        aspect_ratio = rect.aspect_ratio(),
        angle = rect.angle,
        "selected rect"
    );
}
