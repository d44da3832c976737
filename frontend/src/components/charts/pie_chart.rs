use super::geometry::{self, PieLayout, CANVAS_HEIGHT, CANVAS_WIDTH};
use super::{canvas_point, draw_error, slice_color, LABEL_COLOR};
use crate::services::navigation;
use anyhow::anyhow;
use log::error;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters_canvas::CanvasBackend;
use shared::ClickTarget;
use web_sys::HtmlCanvasElement;
use yew::prelude::*;

/// Segments used to approximate a full circle.
const ARC_STEPS: usize = 180;

#[derive(Properties, PartialEq)]
pub struct PieChartProps {
    /// Already truncated for display.
    pub legend_labels: Vec<String>,
    pub values: Vec<f64>,
    /// Leave a hole in the middle.
    #[prop_or_default]
    pub doughnut: bool,
    pub target: ClickTarget,
    pub transactions_url: String,
}

pub enum Msg {
    Clicked(MouseEvent),
}

/// Category breakdown as a pie or doughnut with a legend on the left.
pub struct PieChart {
    canvas_ref: NodeRef,
}

impl Component for PieChart {
    type Message = Msg;
    type Properties = PieChartProps;

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
            error!("Pie chart not drawn: {:#}", err);
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

fn layout(props: &PieChartProps) -> PieLayout {
    PieLayout::new(CANVAS_WIDTH, CANVAS_HEIGHT, &props.values, props.doughnut)
}

fn to_pixel((x, y): (f64, f64)) -> (i32, i32) {
    (x.round() as i32, y.round() as i32)
}

impl PieChart {
    fn draw(&self, props: &PieChartProps) -> anyhow::Result<()> {
        let Some(canvas) = self.canvas_ref.cast::<HtmlCanvasElement>() else {
            return Ok(());
        };
        let backend =
            CanvasBackend::with_canvas_object(canvas).ok_or_else(|| anyhow!("canvas has no 2d context"))?;
        let root = backend.into_drawing_area();
        // Clear the canvas before each redraw
        root.fill(&WHITE).map_err(draw_error)?;

        let pie = layout(props);
        let mut drawn = 0;
        for index in 0..pie.len() {
            match pie.slice_angles(index) {
                Some((start, end)) if end > start => {}
                _ => continue,
            }
            let outline: Vec<(i32, i32)> = pie.slice_outline(index, ARC_STEPS).into_iter().map(to_pixel).collect();
            root.draw(&Polygon::new(outline.clone(), slice_color(index).rgb().filled()))
                .map_err(draw_error)?;

            // White border between slices
            let mut border = outline;
            if let Some(first) = border.first().copied() {
                border.push(first);
            }
            root.draw(&PathElement::new(border, WHITE.stroke_width(2)))
                .map_err(draw_error)?;
            drawn += 1;
        }

        // Nothing to slice: all values zero or empty
        if drawn == 0 {
            let centered = ("sans-serif", 14)
                .into_font()
                .color(&LABEL_COLOR)
                .pos(Pos::new(HPos::Center, VPos::Center));
            root.draw(&Text::new("No data", to_pixel(pie.center), centered))
                .map_err(draw_error)?;
        }

        // Legend column on the left
        let legend_style = ("sans-serif", 14)
            .into_font()
            .color(&LABEL_COLOR)
            .pos(Pos::new(HPos::Left, VPos::Center));
        for (index, label) in props.legend_labels.iter().enumerate() {
            let (x, y) = to_pixel(geometry::legend_row(index));
            root.draw(&Rectangle::new([(x, y + 4), (x + 14, y + 18)], slice_color(index).rgb().filled()))
                .map_err(draw_error)?;
            root.draw(&Text::new(label.as_str(), (x + 22, y + 11), legend_style.clone()))
                .map_err(draw_error)?;
        }

        root.present().map_err(draw_error)?;
        Ok(())
    }
}
