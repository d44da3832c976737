//! Clickable canvas charts and the code that mounts them into the page.

pub mod bar_chart;
pub mod geometry;
pub mod line_chart;
pub mod pie_chart;

pub use bar_chart::{BarChart, BarChartProps};
pub use line_chart::{LineChart, LineChartProps};
pub use pie_chart::{PieChart, PieChartProps};

use anyhow::{anyhow, Context as _};
use log::info;
use plotters::style::{RGBAColor, RGBColor};
use shared::{
    CategorySlices, ClickTarget, DashboardData, ReportData, SpendingData, TransactionKind,
};
use web_sys::{Document, HtmlCanvasElement, MouseEvent};
use yew::BaseComponent;

pub const LABEL_COLOR: RGBColor = RGBColor(102, 126, 234);
pub const AXIS_COLOR: RGBColor = RGBColor(230, 230, 230);
pub const GRID_COLOR: RGBColor = RGBColor(245, 245, 245);

pub const INCOME_COLOR: SeriesColor = SeriesColor(75, 192, 192);
pub const EXPENSE_COLOR: SeriesColor = SeriesColor(255, 99, 132);
pub const NET_COLOR: SeriesColor = SeriesColor(153, 102, 255);
pub const CASH_FLOW_COLOR: SeriesColor = SeriesColor(255, 206, 86);
pub const SPENDING_COLOR: SeriesColor = SeriesColor(255, 159, 64);

const SLICE_PALETTE: [SeriesColor; 8] = [
    SeriesColor(255, 99, 132),
    SeriesColor(54, 162, 235),
    SeriesColor(255, 206, 86),
    SeriesColor(75, 192, 192),
    SeriesColor(153, 102, 255),
    SeriesColor(255, 159, 64),
    SeriesColor(199, 199, 199),
    SeriesColor(83, 102, 255),
];

pub mod hosts {
    pub const MONTHLY_COMBINED: &str = "monthlyCombinedChart";
    pub const MONTHLY_NET: &str = "monthlyNetChart";
    pub const EXPENSE_CATEGORIES: &str = "expenseCategoriesChart";
    pub const INCOME_CATEGORIES: &str = "incomeCategoriesChart";
    pub const CASH_FLOW: &str = "cashFlowChart";
    pub const ANNUAL_OVERVIEW: &str = "annualOverviewChart";
    pub const INCOME_EXPENSE: &str = "incomeExpenseChart";
    pub const MONTHLY_SPENDING: &str = "monthlySpendingChart";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesColor(pub u8, pub u8, pub u8);

impl SeriesColor {
    pub fn rgb(self) -> RGBColor {
        RGBColor(self.0, self.1, self.2)
    }

    /// Translucent fill used for bar and slice bodies.
    pub fn fill(self) -> RGBAColor {
        RGBAColor(self.0, self.1, self.2, 0.6)
    }
}

pub fn slice_color(index: usize) -> SeriesColor {
    SLICE_PALETTE[index % SLICE_PALETTE.len()]
}

/// A named series of values drawn in one color.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: String,
    pub values: Vec<f64>,
    pub color: SeriesColor,
}

impl Dataset {
    pub fn new(label: &str, values: Vec<f64>, color: SeriesColor) -> Self {
        Self {
            label: label.to_string(),
            values,
            color,
        }
    }
}

/// Whole-dollar tick label with thousands separators (`-$12,500`).
pub fn currency_tick(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if rounded < 0.0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

pub fn plain_tick(value: f64) -> String {
    format!("{:.0}", value)
}

/// Click position in canvas pixels.
pub fn canvas_point(canvas: &HtmlCanvasElement, event: &MouseEvent) -> (f64, f64) {
    geometry::to_canvas_coords(
        (f64::from(event.offset_x()), f64::from(event.offset_y())),
        (f64::from(canvas.client_width()), f64::from(canvas.client_height())),
        (canvas.width(), canvas.height()),
    )
}

/// Plotters errors carry backend types that are not `Send`, so keep their text only.
pub(crate) fn draw_error<E: std::fmt::Debug>(err: E) -> anyhow::Error {
    anyhow!("chart drawing failed: {:?}", err)
}

fn mount<C>(document: &Document, host_id: &str, props: C::Properties) -> anyhow::Result<()>
where
    C: BaseComponent,
{
    let host = document
        .get_element_by_id(host_id)
        .with_context(|| format!("chart host #{} is missing", host_id))?;
    yew::Renderer::<C>::with_root_and_props(host, props).render();
    Ok(())
}

/// Monthly bars, net line, both category charts and the cash flow line.
pub fn mount_dashboard_charts(document: &Document, data: &DashboardData) -> anyhow::Result<()> {
    let first_month = data.pie_start_date;
    let period = data.reporting_period();

    mount::<BarChart>(
        document,
        hosts::MONTHLY_COMBINED,
        BarChartProps {
            labels: data.month_labels.clone(),
            datasets: vec![
                Dataset::new("Income", data.monthly_income.clone(), INCOME_COLOR),
                Dataset::new("Expenses", data.monthly_expenses.clone(), EXPENSE_COLOR),
            ],
            target: ClickTarget::MonthlyBars { first_month },
            transactions_url: data.transactions_url.clone(),
            currency_ticks: false,
        },
    )?;

    mount::<LineChart>(
        document,
        hosts::MONTHLY_NET,
        LineChartProps {
            labels: data.month_labels.clone(),
            dataset: Dataset::new("Net", data.monthly_net(), NET_COLOR),
            target: ClickTarget::MonthlyNet { first_month },
            transactions_url: data.transactions_url.clone(),
            currency_ticks: false,
        },
    )?;

    for (host_id, kind, breakdown, doughnut) in [
        (hosts::EXPENSE_CATEGORIES, TransactionKind::Expense, &data.expense_categories, false),
        (hosts::INCOME_CATEGORIES, TransactionKind::Income, &data.income_categories, true),
    ] {
        mount::<PieChart>(
            document,
            host_id,
            PieChartProps {
                legend_labels: breakdown.legend_labels(),
                values: breakdown.values.clone(),
                doughnut,
                target: ClickTarget::CategoryPie {
                    kind,
                    slices: CategorySlices::from(breakdown),
                    period,
                },
                transactions_url: data.transactions_url.clone(),
            },
        )?;
    }

    mount::<LineChart>(
        document,
        hosts::CASH_FLOW,
        LineChartProps {
            labels: data.cash_flow.labels.clone(),
            dataset: Dataset::new("Cash Flow", data.cash_flow.values.clone(), CASH_FLOW_COLOR),
            target: ClickTarget::CashFlow {
                dates: data.cash_flow.labels.clone(),
            },
            transactions_url: data.transactions_url.clone(),
            currency_ticks: false,
        },
    )?;

    info!("Mounted dashboard charts for {} months", data.month_labels.len());
    Ok(())
}

fn report_bars(data: &ReportData, target: ClickTarget) -> BarChartProps {
    BarChartProps {
        labels: data.labels.clone(),
        datasets: vec![
            Dataset::new("Income", data.incomes.clone(), INCOME_COLOR),
            Dataset::new("Expenses", data.expenses.clone(), EXPENSE_COLOR),
        ],
        target,
        transactions_url: data.transactions_url.clone(),
        currency_ticks: true,
    }
}

pub fn mount_annual_overview(document: &Document, data: &ReportData) -> anyhow::Result<()> {
    let target = ClickTarget::AnnualOverview {
        labels: data.labels.clone(),
    };
    mount::<BarChart>(document, hosts::ANNUAL_OVERVIEW, report_bars(data, target))
}

pub fn mount_income_expense(document: &Document, data: &ReportData) -> anyhow::Result<()> {
    let target = ClickTarget::IncomeExpenseReport {
        labels: data.labels.clone(),
    };
    mount::<BarChart>(document, hosts::INCOME_EXPENSE, report_bars(data, target))
}

pub fn mount_monthly_spending(document: &Document, data: &SpendingData) -> anyhow::Result<()> {
    mount::<BarChart>(
        document,
        hosts::MONTHLY_SPENDING,
        BarChartProps {
            labels: data.labels.clone(),
            datasets: vec![Dataset::new("Spending", data.totals.clone(), SPENDING_COLOR)],
            target: ClickTarget::MonthlySpending {
                labels: data.labels.clone(),
            },
            transactions_url: data.transactions_url.clone(),
            currency_ticks: true,
        },
    )
}
