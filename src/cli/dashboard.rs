use std::path::{Path, PathBuf};
use std::sync::Arc;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Points},
        Axis, Bar, BarChart, BarGroup, Cell as TableCell, Chart, Dataset as ChartDataset,
        GraphType, Paragraph, Row, Table,
    },
    Frame,
};

use crate::charts::{donut_slices, format_k, time_axis_labels, y_axis_ticks, DONUT_HOLE};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::fmt::{money, number};
use crate::loader::DatasetCache;
use crate::settings::get_data_file;
use crate::tui::{
    money_span, wrap_text, FOOTER_STYLE, HEADER_ROW_STYLE, HEADER_STYLE, SECTION_STYLE,
    SELECTED_STYLE, WARNING_STYLE,
};
use crate::views::{self, ColumnSummary, ViewData, ViewKind, ALL_VIEWS, PRICE_COLUMN};

const TITLE: &str = "Sales Analysis Dashboard";
const SIDEBAR_WIDTH: u16 = 22;
const PREVIEW_ROWS: usize = 5;

enum DashAction {
    Continue,
    Quit,
}

struct Dashboard {
    dataset: Arc<Dataset>,
    data_path: PathBuf,
    cache: DatasetCache,
    selection: usize,
    /// One-shot "Show Full Data Summary" reveal; cleared on view switch.
    show_summary: bool,
    offset: usize,
    visible_count: usize,
    status_message: Option<String>,
}

impl Dashboard {
    fn new(data_path: PathBuf, cache: DatasetCache, dataset: Arc<Dataset>) -> Self {
        Self {
            dataset,
            data_path,
            cache,
            selection: 0,
            show_summary: false,
            offset: 0,
            visible_count: 20,
            status_message: None,
        }
    }

    fn selected(&self) -> ViewKind {
        ALL_VIEWS[self.selection]
    }

    fn select(&mut self, idx: usize) {
        if idx != self.selection {
            self.selection = idx;
            self.show_summary = false;
            self.offset = 0;
        }
    }

    // -----------------------------------------------------------------------
    // Drawing
    // -----------------------------------------------------------------------

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let [header_area, sep_area, body_area, footer_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(format!(" {TITLE}")).style(HEADER_STYLE),
            header_area,
        );
        frame.render_widget(
            Paragraph::new("━".repeat(area.width as usize)).style(FOOTER_STYLE),
            sep_area,
        );

        let [sidebar_area, content_area] = Layout::horizontal([
            Constraint::Length(SIDEBAR_WIDTH),
            Constraint::Fill(1),
        ])
        .areas(body_area);

        self.draw_sidebar(frame, sidebar_area);
        match self.selected() {
            ViewKind::Overview => self.draw_overview(frame, content_area),
            ViewKind::SalesByProduct => self.draw_product(frame, content_area),
            ViewKind::SalesByRegion => self.draw_region(frame, content_area),
            ViewKind::SalesOverTime => self.draw_time(frame, content_area),
        }

        let hint = match (self.selected(), &self.status_message) {
            (_, Some(msg)) => format!(" {msg}"),
            (ViewKind::Overview, None) => {
                " \u{2191}/\u{2193}=view  s=full summary  j/k=scroll  r=reload  q=quit".to_string()
            }
            (_, None) => " \u{2191}/\u{2193}=view  r=reload  q=quit".to_string(),
        };
        frame.render_widget(Paragraph::new(hint).style(FOOTER_STYLE), footer_area);
    }

    fn draw_sidebar(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![
            Line::from(Span::styled(
                " Navigation",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for (i, view) in ALL_VIEWS.iter().enumerate() {
            let marker = if i == self.selection { ">" } else { " " };
            let style = if i == self.selection {
                SELECTED_STYLE
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(
                format!(" {marker} {}", view.label()),
                style,
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {} rows", number(self.dataset.len())),
            FOOTER_STYLE,
        )));
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn draw_warning(&self, frame: &mut Frame, area: Rect, title: &str, required: &[&'static str; 2]) {
        let [title_area, _, text_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(area);
        frame.render_widget(
            Paragraph::new(format!(" {title}")).style(SECTION_STYLE),
            title_area,
        );
        let (wrapped, _) = wrap_text(
            &ViewData::warning(required),
            text_area.width.saturating_sub(2) as usize,
        );
        frame.render_widget(
            Paragraph::new(wrapped).style(WARNING_STYLE),
            text_area.inner(ratatui::layout::Margin {
                horizontal: 1,
                vertical: 0,
            }),
        );
    }

    fn data_table(&self, rows: &[Vec<crate::dataset::Cell>]) -> Table<'static> {
        let price_idx = self.dataset.column_index(PRICE_COLUMN);
        let header = Row::new(
            self.dataset
                .columns
                .iter()
                .map(|c| TableCell::from(c.clone()))
                .collect::<Vec<_>>(),
        )
        .style(HEADER_ROW_STYLE)
        .bottom_margin(1);

        let body: Vec<Row> = rows
            .iter()
            .map(|row| {
                let cells: Vec<TableCell> = self
                    .dataset
                    .columns
                    .iter()
                    .enumerate()
                    .map(|(i, _)| {
                        let cell = row.get(i).unwrap_or(&crate::dataset::Cell::Empty);
                        if price_idx == Some(i) {
                            TableCell::from(cell.display_money())
                        } else {
                            TableCell::from(cell.display())
                        }
                    })
                    .collect();
                Row::new(cells)
            })
            .collect();

        let widths = vec![Constraint::Fill(1); self.dataset.columns.len().max(1)];
        Table::new(body, widths).header(header).column_spacing(2)
    }

    fn draw_overview(&mut self, frame: &mut Frame, area: Rect) {
        let preview_height = PREVIEW_ROWS.min(self.dataset.len()) as u16 + 3;
        let constraints = if self.show_summary {
            vec![
                Constraint::Length(1),
                Constraint::Length(preview_height),
                Constraint::Length(1),
                Constraint::Fill(1),
                Constraint::Length(1),
                Constraint::Length(10),
            ]
        } else {
            vec![
                Constraint::Length(1),
                Constraint::Length(preview_height),
                Constraint::Fill(1),
            ]
        };
        let chunks = Layout::vertical(constraints).split(area);

        frame.render_widget(
            Paragraph::new(" Data Overview: First 5 Rows of the Data").style(SECTION_STYLE),
            chunks[0],
        );
        frame.render_widget(self.data_table(self.dataset.head(PREVIEW_ROWS)), chunks[1]);

        if !self.show_summary {
            return;
        }

        frame.render_widget(
            Paragraph::new(format!(
                " Full Data ({} rows)",
                number(self.dataset.len())
            ))
            .style(SECTION_STYLE),
            chunks[2],
        );

        // Scrollable full table
        let full_area = chunks[3];
        let visible = full_area.height.saturating_sub(2) as usize;
        self.visible_count = visible.max(1);
        let max = self.dataset.len().saturating_sub(self.visible_count);
        self.offset = self.offset.min(max);
        let end = (self.offset + self.visible_count).min(self.dataset.len());
        frame.render_widget(
            self.data_table(&self.dataset.rows[self.offset..end]),
            full_area,
        );

        frame.render_widget(
            Paragraph::new(" Descriptive Statistics").style(SECTION_STYLE),
            chunks[4],
        );
        frame.render_widget(stats_table(&views::describe(&self.dataset)), chunks[5]);
    }

    fn draw_product(&self, frame: &mut Frame, area: Rect) {
        let series = match views::sales_by_product(&self.dataset) {
            ViewData::Ready(series) => series,
            ViewData::Missing { required } => {
                return self.draw_warning(frame, area, "Sales by Product", &required);
            }
        };
        let [title_area, chart_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(area);
        frame.render_widget(
            Paragraph::new(" Total Sales by Product").style(SECTION_STYLE),
            title_area,
        );

        // Horizontal bars so product names stay readable.
        let palette = crate::charts::SLICE_COLORS;
        let bars: Vec<Bar> = series
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                Bar::default()
                    .value(p.value.round().max(0.0) as u64)
                    .label(Line::from(p.key.clone()))
                    .text_value(money(p.value))
                    .style(Style::default().fg(palette[i % palette.len()]))
            })
            .collect();

        let chart = BarChart::default()
            .direction(Direction::Horizontal)
            .bar_width(1)
            .bar_gap(1)
            .data(BarGroup::default().bars(&bars));
        frame.render_widget(
            chart,
            chart_area.inner(ratatui::layout::Margin {
                horizontal: 1,
                vertical: 1,
            }),
        );
    }

    fn draw_region(&self, frame: &mut Frame, area: Rect) {
        let series = match views::sales_by_region(&self.dataset) {
            ViewData::Ready(series) => series,
            ViewData::Missing { required } => {
                return self.draw_warning(frame, area, "Sales by Region", &required);
            }
        };
        let [title_area, body_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(area);
        frame.render_widget(
            Paragraph::new(" Total Sales by Region").style(SECTION_STYLE),
            title_area,
        );

        let [donut_area, legend_area] =
            Layout::horizontal([Constraint::Percentage(55), Constraint::Fill(1)]).areas(body_area);

        let slices = donut_slices(&series);
        let canvas = Canvas::default()
            .marker(symbols::Marker::Braille)
            .x_bounds([-1.15, 1.15])
            .y_bounds([-1.15, 1.15])
            .paint(|ctx| {
                for slice in &slices {
                    let mut coords: Vec<(f64, f64)> = Vec::new();
                    let mut deg = slice.start_deg;
                    while deg < slice.end_deg {
                        // Clockwise from 12 o'clock
                        let rad = (90.0 - deg).to_radians();
                        let mut r = DONUT_HOLE;
                        while r <= 1.0 {
                            coords.push((r * rad.cos(), r * rad.sin()));
                            r += 0.04;
                        }
                        deg += 1.0;
                    }
                    ctx.draw(&Points {
                        coords: &coords,
                        color: slice.color,
                    });
                }
            });
        frame.render_widget(canvas, donut_area);

        let mut legend = vec![Line::from(""), Line::from("")];
        for slice in donut_slices(&series) {
            legend.push(Line::from(vec![
                Span::styled("\u{25a0} ", Style::default().fg(slice.color)),
                Span::raw(format!("{:<12}", slice.point.key)),
                money_span(slice.point.value),
                Span::styled(format!("  {:.1}%", slice.share * 100.0), FOOTER_STYLE),
            ]));
        }
        legend.push(Line::from(""));
        legend.push(Line::from(vec![
            Span::styled("  Total       ", Style::default().add_modifier(Modifier::BOLD)),
            money_span(series.total),
        ]));
        frame.render_widget(Paragraph::new(legend), legend_area);
    }

    fn draw_time(&self, frame: &mut Frame, area: Rect) {
        let series = match views::sales_over_time(&self.dataset) {
            ViewData::Ready(series) => series,
            ViewData::Missing { required } => {
                return self.draw_warning(frame, area, "Sales Over Time", &required);
            }
        };
        let [title_area, chart_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(area);
        frame.render_widget(
            Paragraph::new(" Total Sales Over Time").style(SECTION_STYLE),
            title_area,
        );

        if series.points.is_empty() {
            frame.render_widget(
                Paragraph::new(" No dated rows to plot.").style(FOOTER_STYLE),
                chart_area,
            );
            return;
        }

        let data: Vec<(f64, f64)> = series
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64, p.value))
            .collect();
        let max_val = data.iter().map(|(_, v)| *v).fold(0.0f64, f64::max);
        let (top, mid) = y_axis_ticks(max_val);

        let datasets = vec![ChartDataset::default()
            .name("Total Sales Amount")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(crate::tui::AMOUNT_STYLE)
            .data(&data)];

        let x_labels: Vec<Span> = time_axis_labels(&series.points)
            .into_iter()
            .map(Span::from)
            .collect();
        let chart = Chart::new(datasets)
            .x_axis(
                Axis::default()
                    .title("Date")
                    .style(FOOTER_STYLE)
                    .bounds([0.0, (series.points.len().saturating_sub(1)).max(1) as f64])
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .style(FOOTER_STYLE)
                    .bounds([0.0, top])
                    .labels(vec![
                        Span::from("$0"),
                        Span::from(format_k(mid)),
                        Span::from(format_k(top)),
                    ]),
            );
        frame.render_widget(chart, chart_area);
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    fn handle_key(&mut self, code: KeyCode) -> Result<DashAction> {
        self.status_message = None;
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(DashAction::Quit),
            KeyCode::Up => self.select(self.selection.saturating_sub(1)),
            KeyCode::Down => self.select((self.selection + 1).min(ALL_VIEWS.len() - 1)),
            KeyCode::Char('s') | KeyCode::Enter if self.selected() == ViewKind::Overview => {
                self.show_summary = true;
            }
            KeyCode::Char('k') | KeyCode::PageUp => {
                self.offset = self.offset.saturating_sub(self.page());
            }
            KeyCode::Char('j') | KeyCode::PageDown => {
                let max = self.dataset.len().saturating_sub(self.visible_count);
                self.offset = (self.offset + self.page()).min(max);
            }
            KeyCode::Char('r') => {
                self.dataset = self.cache.load(&self.data_path)?;
                self.status_message =
                    Some(format!("Reloaded {} rows", number(self.dataset.len())));
            }
            _ => {}
        }
        Ok(DashAction::Continue)
    }

    fn page(&self) -> usize {
        self.visible_count.max(1)
    }
}

fn stats_table(summaries: &[ColumnSummary]) -> Table<'static> {
    let mut header_cells = vec![TableCell::from("")];
    header_cells.extend(
        summaries
            .iter()
            .map(|s| TableCell::from(s.name.clone())),
    );
    let header = Row::new(header_cells).style(HEADER_ROW_STYLE).bottom_margin(1);

    let stat_rows: Vec<(&str, Box<dyn Fn(&ColumnSummary) -> String>)> = vec![
        ("count", Box::new(|s| s.count.to_string())),
        (
            "mean",
            Box::new(|s| s.mean.map(|m| format!("{m:.2}")).unwrap_or_default()),
        ),
        ("min", Box::new(|s| s.min.clone().unwrap_or_default())),
        ("max", Box::new(|s| s.max.clone().unwrap_or_default())),
        (
            "unique",
            Box::new(|s| s.unique.map(|u| u.to_string()).unwrap_or_default()),
        ),
        ("top", Box::new(|s| s.top.clone().unwrap_or_default())),
        (
            "freq",
            Box::new(|s| s.freq.map(|f| f.to_string()).unwrap_or_default()),
        ),
    ];

    let rows: Vec<Row> = stat_rows
        .iter()
        .map(|(label, get)| {
            let mut cells = vec![TableCell::from(Span::styled(
                label.to_string(),
                HEADER_ROW_STYLE,
            ))];
            cells.extend(summaries.iter().map(|s| TableCell::from(get(s))));
            Row::new(cells)
        })
        .collect();

    let widths = vec![Constraint::Fill(1); summaries.len() + 1];
    Table::new(rows, widths).header(header).column_spacing(2)
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

pub fn run() -> Result<()> {
    let path = get_data_file()?;
    run_at(&path, ViewKind::Overview, false)
}

/// Run the dashboard with an initial view selected. A failed load is fatal:
/// no view renders without the table.
pub fn run_at(path: &Path, initial: ViewKind, show_summary: bool) -> Result<()> {
    let mut cache = DatasetCache::new();
    let dataset = cache.load(path)?;

    let mut dashboard = Dashboard::new(path.to_path_buf(), cache, dataset);
    dashboard.selection = ALL_VIEWS.iter().position(|v| *v == initial).unwrap_or(0);
    dashboard.show_summary = show_summary && initial == ViewKind::Overview;

    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        hook(info);
    }));

    let mut terminal = ratatui::init();

    let result: Result<()> = loop {
        if let Err(e) = terminal.draw(|frame| dashboard.draw(frame)) {
            break Err(e.into());
        }
        match event::read() {
            Err(e) => break Err(e.into()),
            Ok(Event::Key(key)) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c')
                {
                    break Ok(());
                }
                match dashboard.handle_key(key.code) {
                    Ok(DashAction::Quit) => break Ok(()),
                    Ok(DashAction::Continue) => {}
                    Err(e) => break Err(e),
                }
            }
            _ => {}
        }
    };

    drop(terminal);
    ratatui::restore();
    result
}
