use super::{Align, Baseline, Paint, Point, Stroke, Surface, TextStyle};
use crate::models::{format_short_date, Workout};

pub const PADDING: f64 = 60.0;
const BANDS: u32 = 5;
const ACCENT: &str = "#4299e1";

/// Calories burned per workout, drawn from zero up to the largest value.
#[derive(Debug, Clone)]
pub struct CalorieChart {
    width: f64,
    height: f64,
}

impl CalorieChart {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// `workouts` must already be oldest-first.
    pub fn points(&self, workouts: &[Workout]) -> Vec<Point> {
        let max = workouts.iter().map(|w| w.calories).max().unwrap_or(0).max(1);
        let graph_width = (self.width - PADDING * 2.0).max(0.0);
        let graph_height = (self.height - PADDING * 2.0).max(0.0);
        let step = if workouts.len() > 1 {
            graph_width / (workouts.len() - 1) as f64
        } else {
            0.0
        };

        workouts
            .iter()
            .enumerate()
            .map(|(index, workout)| {
                Point::new(
                    PADDING + index as f64 * step,
                    self.height - PADDING - f64::from(workout.calories) / f64::from(max) * graph_height,
                )
            })
            .collect()
    }

    pub fn draw<D: Surface>(&self, workouts: &[Workout], surface: &mut D) {
        let (width, height) = (self.width, self.height);
        surface.clear(width, height);

        if workouts.is_empty() {
            surface.text(
                Point::new(width / 2.0, height / 2.0),
                "No workout data available",
                &TextStyle {
                    font: "16px Arial",
                    color: "#a0aec0",
                    align: Align::Center,
                    baseline: Baseline::Middle,
                },
            );
            return;
        }

        let max = workouts.iter().map(|w| w.calories).max().unwrap_or(0).max(1);
        let graph_width = (width - PADDING * 2.0).max(0.0);
        let graph_height = (height - PADDING * 2.0).max(0.0);

        let grid = Stroke::solid("#e2e8f0", 0.5);
        let grid_label = TextStyle {
            font: "12px Arial",
            color: "#718096",
            align: Align::Right,
            baseline: Baseline::Alphabetic,
        };
        for band in 0..=BANDS {
            let y = PADDING + f64::from(band) * graph_height / f64::from(BANDS);
            surface.line(Point::new(PADDING, y), Point::new(PADDING + graph_width, y), &grid);
            let value = (f64::from(max) * f64::from(BANDS - band) / f64::from(BANDS)).round();
            surface.text(Point::new(PADDING - 10.0, y + 4.0), &value.to_string(), &grid_label);
        }

        let axis = Stroke::solid("#4a5568", 2.0);
        surface.line(Point::new(PADDING, PADDING), Point::new(PADDING, height - PADDING), &axis);
        surface.line(
            Point::new(PADDING, height - PADDING),
            Point::new(width - PADDING, height - PADDING),
            &axis,
        );

        let points = self.points(workouts);
        let line = Stroke::solid(ACCENT, 3.0);
        surface.polyline(&points, &line);

        let mut area = points.clone();
        area.push(Point::new(PADDING + graph_width, height - PADDING));
        area.push(Point::new(PADDING, height - PADDING));
        surface.area(
            &area,
            &Paint::VerticalGradient {
                top: PADDING,
                bottom: height - PADDING,
                stops: vec![(0.0, "rgba(66, 153, 225, 0.2)"), (1.0, "rgba(66, 153, 225, 0)")],
            },
        );

        let date_label = TextStyle {
            font: "12px Arial",
            color: "#4a5568",
            align: Align::Center,
            baseline: Baseline::Alphabetic,
        };
        let value_label = TextStyle {
            font: "bold 14px Arial",
            color: ACCENT,
            align: Align::Center,
            baseline: Baseline::Alphabetic,
        };
        for (workout, at) in workouts.iter().zip(&points) {
            surface.circle(*at, 6.0, &Paint::Solid("white"), Some(&line));
            surface.text(
                Point::new(at.x, height - PADDING + 20.0),
                &format_short_date(workout.date),
                &date_label,
            );
            surface.text(Point::new(at.x, at.y - 15.0), &workout.calories.to_string(), &value_label);
        }
    }
}
