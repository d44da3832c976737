use super::geometry::{
    self, BarLayout, PlotArea, CANVAS_HEIGHT, CANVAS_WIDTH, MARGIN, X_LABEL_AREA, Y_LABEL_AREA,
};
use super::{canvas_point, currency_tick, draw_error, plain_tick, Dataset, AXIS_COLOR, GRID_COLOR, LABEL_COLOR};
use crate::services::navigation;
use anyhow::anyhow;
use log::error;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters_canvas::CanvasBackend;
use shared::ClickTarget;
use web_sys::HtmlCanvasElement;
use yew::prelude::*;

const MAX_X_LABELS: usize = 12;

#[derive(Properties, PartialEq)]
pub struct BarChartProps {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub target: ClickTarget,
    pub transactions_url: String,
    /// Format y ticks as whole dollars.
    #[prop_or_default]
    pub currency_ticks: bool,
}

pub enum Msg {
    Clicked(MouseEvent),
}

/// Grouped bar chart; clicking a bar opens its transactions.
pub struct BarChart {
    canvas_ref: NodeRef,
}

impl Component for BarChart {
    type Message = Msg;
    type Properties = BarChartProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            canvas_ref: NodeRef::default(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Clicked(event) => {
                let Some(canvas) = self.canvas_ref.cast::<HtmlCanvasElement>() else {
                    return false;
                };
                let (x, y) = canvas_point(&canvas, &event);
                let props = ctx.props();
                let hit = layout(props).hit(x, y);
                navigation::follow_chart_click(&props.target, &props.transactions_url, hit);
                false
            }
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, _first_render: bool) {
        if let Err(err) = self.draw(ctx.props()) {
            error!("Bar chart not drawn: {:#}", err);
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let onclick = ctx.link().callback(Msg::Clicked);
        html! {
            <canvas
                ref={self.canvas_ref.clone()}
                class="finance-chart-canvas"
                width={CANVAS_WIDTH.to_string()}
                height={CANVAS_HEIGHT.to_string()}
                style="max-width: 100%; cursor: pointer;"
                {onclick}
            ></canvas>
        }
    }
}

fn layout(props: &BarChartProps) -> BarLayout {
    BarLayout::new(
        PlotArea::for_canvas(CANVAS_WIDTH, CANVAS_HEIGHT),
        props.datasets.iter().map(|dataset| dataset.values.clone()).collect(),
    )
}

impl BarChart {
    fn draw(&self, props: &BarChartProps) -> anyhow::Result<()> {
        let Some(canvas) = self.canvas_ref.cast::<HtmlCanvasElement>() else {
            return Ok(());
        };
        let backend =
            CanvasBackend::with_canvas_object(canvas).ok_or_else(|| anyhow!("canvas has no 2d context"))?;
        let root = backend.into_drawing_area();
        // Clear the canvas before each redraw
        root.fill(&WHITE).map_err(draw_error)?;

        let layout = layout(props);
        let range = layout.range;
        let tick: fn(f64) -> String = if props.currency_ticks { currency_tick } else { plain_tick };

        let mut chart = ChartBuilder::on(&root)
            .margin(MARGIN)
            .x_label_area_size(X_LABEL_AREA)
            .y_label_area_size(Y_LABEL_AREA)
            .build_cartesian_2d(0f64..layout.categories().max(1) as f64, range.min..range.max)
            .map_err(draw_error)?;

        // Horizontal grid only; month labels are drawn by hand below
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(0)
            .y_labels(8)
            .y_label_formatter(&|v| tick(*v))
            .label_style(("sans-serif", 12, &LABEL_COLOR))
            .axis_style(&AXIS_COLOR)
            .bold_line_style(&GRID_COLOR)
            .light_line_style(&WHITE)
            .draw()
            .map_err(draw_error)?;

        // One filled pass and one outline pass per dataset
        for (d, dataset) in props.datasets.iter().enumerate() {
            let color = dataset.color;
            let spans: Vec<(f64, f64, f64)> = dataset
                .values
                .iter()
                .enumerate()
                .map(|(i, value)| {
                    let (x0, x1) = layout.bar_span(d, i);
                    (x0, x1, *value)
                })
                .collect();

            chart
                .draw_series(
                    spans
                        .iter()
                        .map(|(x0, x1, value)| Rectangle::new([(*x0, 0.0), (*x1, *value)], color.fill().filled())),
                )
                .map_err(draw_error)?
                .label(dataset.label.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.rgb().filled()));

            chart
                .draw_series(
                    spans
                        .iter()
                        .map(|(x0, x1, value)| Rectangle::new([(*x0, 0.0), (*x1, *value)], color.rgb().stroke_width(1))),
                )
                .map_err(draw_error)?;
        }

        // Legend
        if props.datasets.len() > 1 {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(&AXIS_COLOR)
                .label_font(("sans-serif", 12))
                .draw()
                .map_err(draw_error)?;
        }

        let label_style = ("sans-serif", 12)
            .into_font()
            .color(&LABEL_COLOR)
            .pos(Pos::new(HPos::Center, VPos::Top));
        // Category labels centered under each band, thinned when crowded
        let label_y = (layout.area.bottom + 8.0) as i32;
        let stride = geometry::label_stride(props.labels.len(), MAX_X_LABELS);
        for (i, label) in props.labels.iter().enumerate().step_by(stride) {
            root.draw(&Text::new(
                label.as_str(),
                (layout.band_center_px(i) as i32, label_y),
                label_style.clone(),
            ))
            .map_err(draw_error)?;
        }

        root.present().map_err(draw_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::charts::{EXPENSE_COLOR, INCOME_COLOR};
    use chrono::NaiveDate;
    use shared::ChartHit;

    fn monthly_props() -> BarChartProps {
        BarChartProps {
            labels: vec!["Jan".into(), "Feb".into()],
            datasets: vec![
                Dataset::new("Income", vec![1000.0, 1200.0], INCOME_COLOR),
                Dataset::new("Expenses", vec![400.0, 1500.0], EXPENSE_COLOR),
            ],
            target: ClickTarget::MonthlyBars {
                first_month: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            },
            transactions_url: "/transactions".into(),
            currency_ticks: false,
        }
    }

    #[test]
    fn test_layout_follows_datasets() {
        let layout = layout(&monthly_props());
        assert_eq!(layout.categories(), 2);
        let baseline = layout.range.to_px(&layout.area, 0.0);
        // February expenses: second half of the second band
        assert_eq!(layout.hit(700.0, baseline - 10.0), Some(ChartHit::new(1, 1)));
    }

    #[test]
    fn test_click_on_february_expenses_resolves_to_february() {
        let props = monthly_props();
        let layout = layout(&props);
        let baseline = layout.range.to_px(&layout.area, 0.0);
        let hit = layout.hit(700.0, baseline - 10.0).unwrap();
        let query = props.target.resolve(hit, &Default::default()).unwrap();
        assert_eq!(
            query.to_query_string(),
            "time_filter=custom&start_date=2024-02-01&end_date=2024-02-29&filter=expense"
        );
    }
}
