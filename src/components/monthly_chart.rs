//! Monthly Chart Component
//!
//! Twelve-month rentals/returns bar chart rendered as plain SVG.

use leptos::prelude::*;

use crate::stats::MonthlyBucket;

const CHART_WIDTH: f64 = 720.0;
const CHART_HEIGHT: f64 = 220.0;
const BASELINE: f64 = 190.0;
const GROUP_WIDTH: f64 = CHART_WIDTH / 12.0;
const BAR_WIDTH: f64 = 18.0;

#[component]
pub fn MonthlyChart(#[prop(into)] buckets: Signal<Vec<MonthlyBucket>>) -> impl IntoView {
    let bars = move || {
        let buckets = buckets.get();
        let max = buckets
            .iter()
            .map(|b| b.rentals.max(b.returns))
            .max()
            .unwrap_or(0)
            .max(1) as f64;
        buckets
            .iter()
            .enumerate()
            .map(|(index, bucket)| {
                let x = index as f64 * GROUP_WIDTH + GROUP_WIDTH / 2.0;
                let rentals_h = bucket.rentals as f64 / max * (BASELINE - 20.0);
                let returns_h = bucket.returns as f64 / max * (BASELINE - 20.0);
                view! {
                    <g>
                        <rect
                            class="bar rentals"
                            x=format!("{:.1}", x - BAR_WIDTH - 1.0)
                            y=format!("{:.1}", BASELINE - rentals_h)
                            width=format!("{BAR_WIDTH}")
                            height=format!("{rentals_h:.1}")
                        />
                        <rect
                            class="bar returns"
                            x=format!("{:.1}", x + 1.0)
                            y=format!("{:.1}", BASELINE - returns_h)
                            width=format!("{BAR_WIDTH}")
                            height=format!("{returns_h:.1}")
                        />
                        <text class="bar-label" x=format!("{x:.1}") y=format!("{}", BASELINE + 16.0) text-anchor="middle">
                            {bucket.label()}
                        </text>
                    </g>
                }
            })
            .collect_view()
    };

    view! {
        <div class="card monthly-chart">
            <h3>"Monthly rentals (last 12 months)"</h3>
            <svg viewBox=format!("0 0 {CHART_WIDTH} {CHART_HEIGHT}") class="chart-svg">
                <line class="chart-baseline" x1="0" y1=format!("{BASELINE}") x2=format!("{CHART_WIDTH}") y2=format!("{BASELINE}") />
                {bars}
            </svg>
            <div class="chart-legend">
                <span class="legend rentals">"Rentals"</span>
                <span class="legend returns">"Returns"</span>
            </div>
        </div>
    }
}
