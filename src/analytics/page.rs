//! The analytics page: monthly and per-category aggregate views.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    alert::{AlertKind, alert},
    clock::today_local,
    endpoints,
    html::{
        HeadElement, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, format_currency,
    },
    navigation::NavBar,
};

use super::{
    AnalyticsState, CategoryTotal, MonthlyTotal,
    charts::{AnalyticsChart, category_spending_chart, charts_script, monthly_spending_chart},
    core::{DEFAULT_WINDOW_MONTHS, category_totals, monthly_totals},
};

const ECHARTS_SCRIPT_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// Display aggregate spending: a monthly chart over the trailing six months
/// and a per-category breakdown.
///
/// If the store cannot be read the page is still served, with empty data and
/// a visible error notice.
pub async fn get_analytics_page(State(state): State<AnalyticsState>) -> Response {
    let nav_bar = NavBar::new(endpoints::ANALYTICS);

    let aggregates = fetch_aggregates(&state);

    match aggregates {
        Ok((monthly, by_category)) => {
            analytics_view(nav_bar, &monthly, &by_category).into_response()
        }
        Err(error) => {
            tracing::error!("could not load analytics data: {error}");
            analytics_degraded_view(nav_bar).into_response()
        }
    }
}

fn fetch_aggregates(
    state: &AnalyticsState,
) -> Result<(Vec<MonthlyTotal>, Vec<CategoryTotal>), Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let monthly = monthly_totals(DEFAULT_WINDOW_MONTHS, today_local(), &connection)?;
    let by_category = category_totals(&connection)?;

    Ok((monthly, by_category))
}

fn analytics_view(
    nav_bar: NavBar,
    monthly: &[MonthlyTotal],
    by_category: &[CategoryTotal],
) -> Markup {
    let nav_bar = nav_bar.into_html();

    if monthly.is_empty() && by_category.is_empty() {
        let content = html!(
            (nav_bar)

            div class=(PAGE_CONTAINER_STYLE)
            {
                h2 class="text-xl font-bold" { "Nothing here yet..." }

                p
                {
                    "Charts will show up here once you add some expenses."
                }
            }
        );

        return base("Analytics", &[], &content);
    }

    let charts = [
        AnalyticsChart {
            id: "monthly-spending-chart",
            options: monthly_spending_chart(monthly).to_string(),
        },
        AnalyticsChart {
            id: "category-spending-chart",
            options: category_spending_chart(by_category).to_string(),
        },
    ];

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            section
                id="charts"
                class="w-full max-w-screen-xl mx-auto mb-4"
            {
                div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
                {
                    @for chart in &charts {
                        div
                            id=(chart.id)
                            class="min-h-[380px] rounded dark:bg-gray-100"
                        {}
                    }
                }
            }

            (category_breakdown_table(by_category))
        }
    );

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT_URL.to_owned()),
        charts_script(&charts),
    ];

    base("Analytics", &scripts, &content)
}

fn analytics_degraded_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            (alert(
                AlertKind::Error,
                "Could not load analytics.",
                "Try again later or check the server logs.",
            ))
        }
    );

    base("Analytics", &[], &content)
}

fn category_breakdown_table(by_category: &[CategoryTotal]) -> Markup {
    html!(
        @if !by_category.is_empty() {
            div class="w-full max-w-2xl relative overflow-x-auto shadow-md sm:rounded-lg"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Total" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Expenses" }
                        }
                    }

                    tbody
                    {
                        @for bucket in by_category {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td class=(TABLE_CELL_STYLE) { (bucket.name) }
                                td class=(TABLE_CELL_STYLE) { (format_currency(bucket.total)) }
                                td class=(TABLE_CELL_STYLE) { (bucket.count) }
                            }
                        }
                    }
                }
            }
        }
    )
}
