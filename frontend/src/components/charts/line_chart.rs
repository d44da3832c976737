use super::geometry::{
    self, LineLayout, PlotArea, CANVAS_HEIGHT, CANVAS_WIDTH, MARGIN, POINT_RADIUS, X_LABEL_AREA, Y_LABEL_AREA,
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

const MAX_X_LABELS: usize = 10;

#[derive(Properties, PartialEq)]
pub struct LineChartProps {
    pub labels: Vec<String>,
    pub dataset: Dataset,
    pub target: ClickTarget,
    pub transactions_url: String,
    #[prop_or_default]
    pub currency_ticks: bool,
}

pub enum Msg {
    Clicked(MouseEvent),
}

/// Single-series line chart with clickable points.
pub struct LineChart {
    canvas_ref: NodeRef,
}

impl Component for LineChart {
    type Message = Msg;
    type Properties = LineChartProps;

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
            error!("Line chart not drawn: {:#}", err);
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

fn layout(props: &LineChartProps) -> LineLayout {
    LineLayout::new(
        PlotArea::for_canvas(CANVAS_WIDTH, CANVAS_HEIGHT),
        props.dataset.values.clone(),
    )
}

impl LineChart {
    fn draw(&self, props: &LineChartProps) -> anyhow::Result<()> {
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
        let color = props.dataset.color;

        let mut chart = ChartBuilder::on(&root)
            .margin(MARGIN)
            .x_label_area_size(X_LABEL_AREA)
            .y_label_area_size(Y_LABEL_AREA)
            .build_cartesian_2d(layout.x_range(), range.min..range.max)
            .map_err(draw_error)?;

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

        // Zero line when the series crosses it
        let x_range = layout.x_range();
        if range.min < 0.0 && range.max > 0.0 {
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(x_range.start, 0.0), (x_range.end, 0.0)],
                    RGBColor(200, 200, 200).stroke_width(1),
                )))
                .map_err(draw_error)?;
        }

        let points: Vec<(f64, f64)> = props
            .dataset
            .values
            .iter()
            .enumerate()
            .map(|(i, value)| (i as f64, *value))
            .collect();

        // Line first, then the point markers on top
        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.rgb().stroke_width(2)))
            .map_err(draw_error)?;
        chart
            .draw_series(
                points
                    .iter()
                    .map(|point| Circle::new(*point, POINT_RADIUS, color.rgb().filled())),
            )
            .map_err(draw_error)?;
        chart
            .draw_series(points.iter().map(|point| Circle::new(*point, POINT_RADIUS, WHITE.stroke_width(1))))
            .map_err(draw_error)?;

        let label_style = ("sans-serif", 12)
            .into_font()
            .color(&LABEL_COLOR)
            .pos(Pos::new(HPos::Center, VPos::Top));
        // Date labels under the axis
        let label_y = (layout.area.bottom + 8.0) as i32;
        let stride = geometry::label_stride(props.labels.len(), MAX_X_LABELS);
        for (i, label) in props.labels.iter().enumerate().step_by(stride) {
            let Some((x, _)) = layout.point_px(i) else {
                continue;
            };
            root.draw(&Text::new(label.as_str(), (x as i32, label_y), label_style.clone()))
                .map_err(draw_error)?;
        }

        root.present().map_err(draw_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::charts::CASH_FLOW_COLOR;
    use shared::ChartHit;

    fn cash_flow_props() -> LineChartProps {
        let dates = vec!["2024-01-31".to_string(), "2024-02-29".to_string(), "2024-03-15".to_string()];
        LineChartProps {
            labels: dates.clone(),
            dataset: Dataset::new("Cash Flow", vec![600.0, 300.0, 450.0], CASH_FLOW_COLOR),
            target: ClickTarget::CashFlow { dates },
            transactions_url: "/transactions?page=1".into(),
            currency_ticks: false,
        }
    }

    #[test]
    fn test_point_click_opens_month_to_date() {
        let props = cash_flow_props();
        let layout = layout(&props);
        let (x, y) = layout.point_px(2).unwrap();
        let hit = layout.hit(x + 2.0, y + 2.0);
        assert_eq!(hit, Some(ChartHit::new(0, 2)));

        let query = props.target.resolve(hit.unwrap(), &Default::default()).unwrap();
        assert_eq!(
            query.to_url(&props.transactions_url),
            "/transactions?page=1&time_filter=custom&start_date=2024-03-01&end_date=2024-03-15"
        );
    }

    #[test]
    fn test_click_between_points_hits_nothing() {
        let props = cash_flow_props();
        let layout = layout(&props);
        let (x0, _) = layout.point_px(0).unwrap();
        let (x1, _) = layout.point_px(1).unwrap();
        assert_eq!(layout.hit((x0 + x1) / 2.0, 20.0), None);
    }
}
