//! TUI rendering using ratatui.

use std::time::Instant;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Wrap},
    Frame,
};

use copilot_models::{
    Analysis, ExploreAnalysis, GrowthAnalysis, Scenario, SwitchAnalysis,
};
use copilot_wizard::Screen;

use super::app::{App, GoalField, ServiceStatus, SkillsFocus, UploadNotice};
use super::theme::Theme;
use super::widgets::{confirm_level_label, picker_level_label, SearchSelect};

/// Draw the UI.
pub fn draw(frame: &mut Frame, app: &App, theme: &Theme, now: Instant) {
    if app.service != ServiceStatus::Up {
        draw_service_gate(frame, app, theme);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(5),    // Screen body
            Constraint::Length(1), // Toast line
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    draw_header(frame, app, theme, chunks[0]);

    match app.wizard.screen() {
        Screen::Welcome => draw_welcome(frame, theme, chunks[1]),
        Screen::Goal => draw_goal(frame, app, theme, chunks[1]),
        Screen::Skills => draw_skills(frame, app, theme, chunks[1]),
        Screen::Confirm => draw_confirm(frame, app, theme, chunks[1], now),
        Screen::Result => draw_result(frame, app, theme, chunks[1], now),
    }

    draw_toast_line(frame, app, theme, chunks[2]);
    draw_footer(frame, app, theme, chunks[3]);

    if app.profession_select.is_open() {
        draw_select_popup(frame, &app.profession_select, theme, "Профессия", chunks[1]);
    } else if app.target_select.is_open() {
        draw_select_popup(frame, &app.target_select, theme, "Целевая профессия", chunks[1]);
    }
}

/// Draw the availability gate shown until the health probe answers.
fn draw_service_gate(frame: &mut Frame, app: &App, theme: &Theme) {
    let area = centered_rect(64, 9, frame.area());
    let lines = if app.service == ServiceStatus::Checking {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                "Проверяем доступность сервиса…",
                Style::default().fg(theme.muted),
            )),
        ]
    } else {
        vec![
            Line::from(Span::styled(
                "Сервис временно недоступен",
                Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Мы уже на старте — попробуйте обновить страницу через минуту.",
                Style::default().fg(theme.muted),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "[Enter] Проверить снова · [Esc] Выход",
                Style::default().fg(theme.accent),
            )),
        ]
    };
    let panel = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border))
                .title(" Career Copilot "),
        );
    frame.render_widget(Clear, area);
    frame.render_widget(panel, area);
}

/// Draw the header bar with the step strip.
fn draw_header(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let screen = app.wizard.screen();
    let text = match screen.step() {
        Some(step) => format!(" Career Copilot · Шаг {}/3 · {} ", step, screen.step_label()),
        None => " Career Copilot ".to_string(),
    };
    let header = Paragraph::new(text).style(
        Style::default()
            .bg(theme.accent)
            .fg(theme.surface)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(header, area);
}

/// Draw the welcome hero.
fn draw_welcome(frame: &mut Frame, theme: &Theme, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Career Copilot",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Ваш навигатор в профессиональном росте",
            Style::default().fg(theme.text),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Давайте вместе построим маршрут к вашему следующему карьерному шагу.",
            Style::default().fg(theme.muted),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "1 Определим цель · 2 Опишем навыки · 3 Сформируем план",
            Style::default().fg(theme.muted),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "[Enter] Начать путь",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )),
    ];
    let hero = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(hero, area);
}

/// Draw the goal screen: profession, scenario, target role and grade.
fn draw_goal(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let state = app.wizard.state();
    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            "Определим вашу цель",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Выберите направление развития — Career Copilot соберёт оптимальный маршрут.",
            Style::default().fg(theme.muted),
        )),
        Line::from(""),
    ];

    if app.professions_loading {
        lines.push(Line::from(Span::styled(
            "Загружаем данные...",
            Style::default().fg(theme.muted),
        )));
        let body = Paragraph::new(lines).wrap(Wrap { trim: false });
        frame.render_widget(body, area);
        return;
    }

    if let Some(error) = &app.goal_error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(theme.warning),
        )));
        lines.push(Line::from(""));
    }

    let profession = if state.profession.is_empty() {
        "Выберите профессию"
    } else {
        state.profession.as_str()
    };
    lines.push(field_line(
        "Ваша текущая профессия",
        profession,
        app.goal_focus == GoalField::Profession,
        state.profession.is_empty(),
        theme,
    ));
    lines.push(helper_line(
        "Мы подтянем релевантные навыки и требования для этой роли.",
        theme,
    ));
    lines.push(Line::from(""));

    lines.push(section_line("Направление", app.goal_focus == GoalField::Scenario, theme));
    for (index, scenario) in Scenario::ALL.iter().enumerate() {
        let selected = state.scenario == Some(*scenario);
        let on_cursor = app.goal_focus == GoalField::Scenario && index == app.scenario_cursor;
        let marker = if selected { "[x]" } else { "[ ]" };
        let style = if on_cursor {
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
        } else if selected {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.text)
        };
        lines.push(Line::from(Span::styled(
            format!("  {} {} — {}", marker, scenario.label(), scenario.description()),
            style,
        )));
    }
    lines.push(Line::from(""));

    if state.scenario.map(|s| s.requires_target()).unwrap_or(false) {
        let target = if state.target_profession.is_empty() {
            "Выберите роль"
        } else {
            state.target_profession.as_str()
        };
        lines.push(field_line(
            "Целевая профессия",
            target,
            app.goal_focus == GoalField::Target,
            state.target_profession.is_empty(),
            theme,
        ));
        lines.push(helper_line("Выберите роль, в которую хотите перейти.", theme));
        lines.push(Line::from(""));
    }

    lines.push(field_line(
        "Текущий грейд",
        state.grade.label(),
        app.goal_focus == GoalField::Grade,
        false,
        theme,
    ));
    lines.push(helper_line(
        "Уровень нужен, чтобы корректно оценить «шаг вверх».",
        theme,
    ));
    lines.push(Line::from(""));

    let continue_style = if app.goal_focus == GoalField::Continue {
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };
    lines.push(Line::from(Span::styled("  [Enter] Продолжить", continue_style)));

    let body = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(body, area);
}

/// Draw the skills screen: manual entry, quick add, inventory, resume.
fn draw_skills(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let state = app.wizard.state();
    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            "Навыки",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Загрузите резюме или добавьте навыки вручную.",
            Style::default().fg(theme.muted),
        )),
        Line::from(""),
    ];

    if let Some(error) = &app.skills_error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(theme.warning),
        )));
        lines.push(Line::from(""));
    }

    lines.push(section_line(
        "Добавьте навыки",
        app.skills_focus == SkillsFocus::Input,
        theme,
    ));
    lines.push(helper_line(
        "Можно вручную — введите название или выберите из подсказок.",
        theme,
    ));
    let query = app.autocomplete.query();
    let input = if query.is_empty() {
        Span::styled(
            "Начните вводить навык: например, SQL, коммуникации, roadmap…",
            Style::default().fg(theme.muted),
        )
    } else {
        Span::styled(query, Style::default().fg(theme.text))
    };
    lines.push(Line::from(vec![
        Span::styled("  Поиск: ", Style::default().fg(theme.muted)),
        input,
    ]));
    if app.autocomplete.is_open() {
        for (index, suggestion) in app.autocomplete.suggestions().iter().enumerate() {
            let style = if app.autocomplete.highlighted() == Some(index) {
                Style::default().fg(theme.surface).bg(theme.accent)
            } else {
                Style::default().fg(theme.text)
            };
            lines.push(Line::from(Span::styled(format!("    {}", suggestion), style)));
        }
    }
    lines.push(helper_line(
        "Подсказки учитывают синонимы и близкие формулировки.",
        theme,
    ));

    let quick = app.quick_add();
    if !quick.is_empty() {
        lines.push(Line::from(""));
        lines.push(section_line(
            &format!("Навыки профессии «{}»:", state.profession),
            app.skills_focus == SkillsFocus::QuickAdd,
            theme,
        ));
        let mut spans = vec![Span::raw("  ")];
        for (index, name) in quick.iter().enumerate() {
            let style = if app.skills_focus == SkillsFocus::QuickAdd && index == app.quick_cursor
            {
                Style::default().fg(theme.surface).bg(theme.accent)
            } else {
                Style::default().fg(theme.text)
            };
            spans.push(Span::styled(format!("[+ {}]", name), style));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    lines.push(section_line(
        &format!("Выбранные навыки ({})", state.skills.len()),
        app.skills_focus == SkillsFocus::List,
        theme,
    ));
    if state.skills.is_empty() {
        lines.push(helper_line(
            "Пока пусто. Добавьте 3–7 навыков — и мы соберём более точный план.",
            theme,
        ));
    } else {
        for (index, skill) in state.skills.iter().enumerate() {
            let on_cursor = app.skills_focus == SkillsFocus::List && index == app.skill_cursor;
            let marker = if on_cursor { "› " } else { "  " };
            let name_style = if on_cursor {
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{}{}", marker, skill.name), name_style),
                Span::styled(
                    format!("  ‹ {} ›", picker_level_label(skill.level)),
                    Style::default().fg(theme.accent_soft),
                ),
            ]));
        }
        lines.push(helper_line("Выберите уровень честно — план станет точнее.", theme));
    }

    lines.push(Line::from(""));
    lines.push(section_line(
        "Загрузите резюме (PDF)",
        app.skills_focus == SkillsFocus::Resume,
        theme,
    ));
    lines.push(helper_line(
        "Мы извлечём навыки и предложим их к подтверждению.",
        theme,
    ));
    if app.resume_loading {
        lines.push(Line::from(Span::styled(
            "  Читаем резюме… Это обычно занимает до минуты.",
            Style::default().fg(theme.muted),
        )));
    } else {
        let path = if app.resume_path.is_empty() {
            Span::styled("путь к файлу .pdf", Style::default().fg(theme.muted))
        } else {
            Span::styled(app.resume_path.as_str(), Style::default().fg(theme.text))
        };
        lines.push(Line::from(vec![
            Span::styled("  Файл: ", Style::default().fg(theme.muted)),
            path,
        ]));
    }
    if let Some(notice) = &app.upload_notice {
        match notice {
            UploadNotice::Success(text) => lines.push(Line::from(Span::styled(
                format!("  {}", text),
                Style::default().fg(theme.success),
            ))),
            UploadNotice::Info(text) => lines.push(Line::from(Span::styled(
                format!("  {}", text),
                Style::default().fg(theme.muted),
            ))),
            UploadNotice::Error { title, text } => {
                lines.push(Line::from(Span::styled(
                    format!("  {}", title),
                    Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(Span::styled(
                    format!("  {}", text),
                    Style::default().fg(theme.muted),
                )));
            }
        }
    }

    lines.push(Line::from(""));
    let continue_style = if app.skills_focus == SkillsFocus::Continue {
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };
    lines.push(Line::from(Span::styled("  [Enter] Собрать план", continue_style)));

    let body = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(body, area);
}

/// Draw the confirmation summary, or the build progress while a plan
/// request is in flight.
fn draw_confirm(frame: &mut Frame, app: &App, theme: &Theme, area: Rect, now: Instant) {
    if app.building {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(area);
        let text = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Собираем план…",
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Сопоставляем навыки с требованиями роли и формируем шаги.",
                Style::default().fg(theme.muted),
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(text, chunks[0]);
        if let Some(progress) = &app.build_progress {
            let gauge = Gauge::default()
                .gauge_style(Style::default().fg(theme.accent).bg(theme.surface))
                .ratio(progress.ratio(now));
            frame.render_widget(gauge, chunks[1]);
        }
        return;
    }

    let state = app.wizard.state();
    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            "Проверим ввод — и соберём план",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Убедитесь, что всё верно, и нажмите кнопку.",
            Style::default().fg(theme.muted),
        )),
        Line::from(""),
    ];

    if let Some(error) = &app.confirm_error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(theme.error),
        )));
        lines.push(Line::from(""));
    }

    lines.push(section_line("Цель", false, theme));
    lines.push(summary_line("Профессия", &state.profession, theme));
    lines.push(summary_line(
        "Сценарий",
        state.scenario.map(|s| s.label()).unwrap_or("—"),
        theme,
    ));
    lines.push(summary_line("Грейд", state.grade.label(), theme));
    if state.scenario.map(|s| s.requires_target()).unwrap_or(false) {
        lines.push(summary_line("Целевая профессия", &state.target_profession, theme));
    }
    lines.push(Line::from(""));

    lines.push(section_line(
        &format!("Навыки ({} добавлено)", state.skills.len()),
        false,
        theme,
    ));
    let mut preview: Vec<_> = state.skills.iter().collect();
    preview.sort_by(|a, b| a.name.cmp(&b.name));
    for skill in preview.iter().take(5) {
        lines.push(Line::from(vec![
            Span::styled(format!("  {} ", skill.name), Style::default().fg(theme.text)),
            Span::styled(
                confirm_level_label(skill.level).to_string(),
                Style::default().fg(theme.accent_soft),
            ),
        ]));
    }
    if preview.len() > 5 {
        lines.push(Line::from(Span::styled(
            format!("  +{} ещё", preview.len() - 5),
            Style::default().fg(theme.muted),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  [Enter] Собрать мой план   [Esc] Вернуться и поправить",
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
    )));

    let body = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(body, area);
}

/// Draw the analysis results, gap selection and focused plan.
fn draw_result(frame: &mut Frame, app: &App, theme: &Theme, area: Rect, now: Instant) {
    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            "Результаты анализа",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Выберите навыки для развития и сформируйте план.",
            Style::default().fg(theme.muted),
        )),
        Line::from(""),
    ];

    if let Some(plan) = app.wizard.plan() {
        match &plan.analysis {
            Some(Analysis::Growth(growth)) => push_growth(&mut lines, growth, theme),
            Some(Analysis::Switch(switch)) => push_switch(&mut lines, switch, theme),
            Some(Analysis::Explore(explore)) => push_explore(&mut lines, explore, theme),
            None => {
                // No structured analysis, show the markdown as-is
                for raw in plan.markdown.lines() {
                    lines.push(Line::from(raw.to_string()));
                }
                lines.push(Line::from(""));
            }
        }
    }

    push_gap_chips(&mut lines, app, theme);
    push_focused_plan(&mut lines, app, theme, now);

    if let Some(notice) = &app.export_notice {
        let style = if notice.starts_with("Сохранено") {
            Style::default().fg(theme.success)
        } else {
            Style::default().fg(theme.error)
        };
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(notice.clone(), style)));
    }

    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.result_scroll, 0));
    frame.render_widget(body, area);
}

/// Append the growth analysis sections.
fn push_growth(lines: &mut Vec<Line<'static>>, data: &GrowthAnalysis, theme: &Theme) {
    lines.push(Line::from(Span::styled(
        "План роста".to_string(),
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(vec![
        Span::styled(
            format!("{} → {}", data.current_grade, data.target_grade),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("   Совпадение {}%", data.match_percent),
            Style::default().fg(theme.accent),
        ),
    ]));
    lines.push(Line::from(""));

    let zones: Vec<_> = data.radar_data.iter().filter(|p| p.target > p.current).collect();
    if !zones.is_empty() {
        lines.push(Line::from(Span::styled(
            "Зоны развития".to_string(),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )));
        for point in zones {
            lines.push(Line::from(vec![
                Span::styled(format!("  {}: ", point.param), Style::default().fg(theme.text)),
                Span::styled(
                    format!("{} → {}", point.current_label, point.target_label),
                    Style::default().fg(theme.warning),
                ),
            ]));
        }
        lines.push(Line::from(""));
    }

    let detailed: Vec<_> = data
        .skill_gaps
        .iter()
        .filter(|g| !g.description.is_empty() || !g.tasks.is_empty())
        .collect();
    if !detailed.is_empty() {
        lines.push(Line::from(Span::styled(
            "Навыки: описание и задачи".to_string(),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )));
        for gap in detailed {
            let mut header = vec![Span::styled(
                format!("  {}", gap.name),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            )];
            if !gap.level_key.is_empty() {
                header.push(Span::styled(
                    format!("  [{}]", gap.level_key),
                    Style::default().fg(theme.accent_soft),
                ));
            }
            lines.push(Line::from(header));
            if !gap.description.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("    {}", gap.description),
                    Style::default().fg(theme.muted),
                )));
            }
            for task in gap.tasks.lines().filter(|t| !t.trim().is_empty()) {
                lines.push(Line::from(Span::styled(
                    format!("    · {}", task.trim()),
                    Style::default().fg(theme.text),
                )));
            }
        }
        lines.push(Line::from(""));
    }

    if !data.skill_strong.is_empty() {
        lines.push(Line::from(Span::styled(
            "Сильные стороны".to_string(),
            Style::default().fg(theme.success).add_modifier(Modifier::BOLD),
        )));
        let names: Vec<_> = data.skill_strong.iter().map(|s| s.name.as_str()).collect();
        lines.push(Line::from(Span::styled(
            format!("  {}", names.join(" · ")),
            Style::default().fg(theme.text),
        )));
        lines.push(Line::from(""));
    }
}

/// Append the profession-switch analysis sections.
fn push_switch(lines: &mut Vec<Line<'static>>, data: &SwitchAnalysis, theme: &Theme) {
    lines.push(Line::from(vec![
        Span::styled("Из профессии: ".to_string(), Style::default().fg(theme.muted)),
        Span::styled(
            data.from_role.clone(),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
        Span::styled("   В профессию: ".to_string(), Style::default().fg(theme.muted)),
        Span::styled(
            data.to_role.clone(),
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.push(Line::from(Span::styled(
        format!("Совместимость {}%", data.match_percent),
        Style::default().fg(theme.accent),
    )));
    lines.push(Line::from(""));

    if !data.transferable.is_empty() {
        lines.push(Line::from(Span::styled(
            "Переносимые навыки".to_string(),
            Style::default().fg(theme.success).add_modifier(Modifier::BOLD),
        )));
        for skill in &data.transferable {
            let mut spans = vec![Span::styled(
                format!("  {}", skill.name),
                Style::default().fg(theme.text),
            )];
            if !skill.snippet.is_empty() {
                spans.push(Span::styled(
                    format!(" — {}", skill.snippet),
                    Style::default().fg(theme.muted),
                ));
            }
            lines.push(Line::from(spans));
        }
        lines.push(Line::from(""));
    }

    if !data.gaps.is_empty() {
        lines.push(Line::from(Span::styled(
            "Зона роста".to_string(),
            Style::default().fg(theme.warning).add_modifier(Modifier::BOLD),
        )));
        for gap in &data.gaps {
            let mut header = vec![Span::styled(
                format!("  {}", gap.name),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            )];
            if !gap.importance.is_empty() {
                header.push(Span::styled(
                    format!("  ({})", gap.importance),
                    Style::default().fg(theme.muted),
                ));
            }
            lines.push(Line::from(header));
            if !gap.description.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("    {}", gap.description),
                    Style::default().fg(theme.muted),
                )));
            }
            for task in gap.tasks.lines().filter(|t| !t.trim().is_empty()) {
                lines.push(Line::from(Span::styled(
                    format!("    · {}", task.trim()),
                    Style::default().fg(theme.text),
                )));
            }
        }
        lines.push(Line::from(""));
    }
}

/// Append the exploration role cards.
fn push_explore(lines: &mut Vec<Line<'static>>, data: &ExploreAnalysis, theme: &Theme) {
    for role in &data.roles {
        lines.push(Line::from(vec![
            Span::styled(
                role.title.clone(),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}%", role.match_percent),
                Style::default().fg(theme.accent),
            ),
            Span::styled(
                format!("  {}", role.category.label()),
                Style::default().fg(theme.muted),
            ),
        ]));
        if !role.missing.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("  Не хватает: {}", role.missing.join(", ")),
                Style::default().fg(theme.muted),
            )));
        }
        for reason in &role.reasons {
            lines.push(Line::from(Span::styled(
                format!("  · {}", reason),
                Style::default().fg(theme.muted),
            )));
        }
        lines.push(Line::from(""));
    }
}

/// Append the gap-selection chips under the analysis.
fn push_gap_chips(lines: &mut Vec<Line<'static>>, app: &App, theme: &Theme) {
    let gaps = app.gap_names();
    if gaps.is_empty() || app.focused_plan.is_some() || app.focused_loading {
        return;
    }
    lines.push(Line::from(Span::styled(
        "Что хотите развить?".to_string(),
        Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        "Выберите навыки — мы сформируем фокусный план".to_string(),
        Style::default().fg(theme.muted),
    )));
    let mut spans = vec![Span::raw("  ")];
    for (index, name) in gaps.iter().enumerate() {
        let selected = app.selected_gaps.contains(name);
        let mark = if selected { "✓ " } else { "" };
        let mut style = if selected {
            Style::default().fg(theme.surface).bg(theme.accent)
        } else {
            Style::default().fg(theme.text)
        };
        if index == app.gap_cursor {
            style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        spans.push(Span::styled(format!("[{}{}]", mark, name), style));
        spans.push(Span::raw(" "));
    }
    lines.push(Line::from(spans));
    if !app.selected_gaps.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("  [Enter] Сформировать план ({})", app.selected_gaps.len()),
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )));
    }
    if let Some(error) = &app.focused_error {
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            Style::default().fg(theme.error),
        )));
    }
    lines.push(Line::from(""));
}

/// Append the focused plan, or its progress bar while it builds.
fn push_focused_plan(lines: &mut Vec<Line<'static>>, app: &App, theme: &Theme, now: Instant) {
    if app.focused_loading {
        lines.push(Line::from(Span::styled(
            "Формируем персональный план…".to_string(),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            "Это займёт несколько секунд".to_string(),
            Style::default().fg(theme.muted),
        )));
        if let Some(progress) = &app.focused_progress {
            let filled = (progress.ratio(now) * 30.0).round() as usize;
            let bar = format!(
                "  {}{}",
                "█".repeat(filled),
                "░".repeat(30usize.saturating_sub(filled))
            );
            lines.push(Line::from(Span::styled(bar, Style::default().fg(theme.accent))));
        }
        lines.push(Line::from(""));
        return;
    }

    let plan = match &app.focused_plan {
        Some(plan) => plan,
        None => return,
    };

    lines.push(Line::from(Span::styled(
        "Задачи на развитие".to_string(),
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
    )));
    for task in &plan.tasks {
        lines.push(Line::from(Span::styled(
            format!("  {}", task.skill),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )));
        for item in &task.items {
            lines.push(Line::from(Span::styled(
                format!("    · {}", item),
                Style::default().fg(theme.text),
            )));
        }
    }
    lines.push(Line::from(""));

    if !plan.communication.is_empty() {
        lines.push(Line::from(Span::styled(
            "Развитие через общение".to_string(),
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )));
        for item in &plan.communication {
            lines.push(Line::from(Span::styled(
                format!("  · {}", item),
                Style::default().fg(theme.text),
            )));
        }
        lines.push(Line::from(""));
    }

    if !plan.learning.is_empty() {
        lines.push(Line::from(Span::styled(
            "Книги и тренинги".to_string(),
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )));
        for item in &plan.learning {
            lines.push(Line::from(Span::styled(
                format!("  · {}", item),
                Style::default().fg(theme.text),
            )));
        }
        lines.push(Line::from(""));
    }
}

/// Draw the toast line above the footer.
fn draw_toast_line(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    if let Some(toast) = &app.toast {
        let mut text = format!(" {} ", toast.message);
        if toast.undo.is_some() {
            text.push_str("· [Ctrl+Z] Вернуть ");
        }
        let line = Paragraph::new(text).style(Style::default().bg(theme.surface).fg(theme.text));
        frame.render_widget(line, area);
    }
}

/// Draw the footer with key hints for the current screen.
fn draw_footer(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let keys = match app.wizard.screen() {
        Screen::Welcome => "Enter: начать · Esc: выход",
        Screen::Goal => "Tab: поля · Enter: выбрать · Alt+←/→: история · Esc: назад",
        Screen::Skills => {
            "Tab: секции · Enter: добавить · d: удалить · Ctrl+Z: вернуть · Esc: назад"
        }
        Screen::Confirm => "Enter: собрать план · Esc: назад",
        Screen::Result => {
            "Пробел: отметить · Enter: план · s: сохранить · n: навыки · r: заново · Esc: назад"
        }
    };
    let footer =
        Paragraph::new(format!(" {} ", keys)).style(Style::default().bg(theme.surface).fg(theme.muted));
    frame.render_widget(footer, area);
}

/// Draw an open role picker as a popup over the screen body.
fn draw_select_popup(
    frame: &mut Frame,
    select: &SearchSelect,
    theme: &Theme,
    title: &str,
    area: Rect,
) {
    let popup = centered_rect(area.width.saturating_sub(10).clamp(20, 60), 14, area);
    frame.render_widget(Clear, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(popup);

    let query = if select.query().is_empty() {
        Span::styled("Поиск…", Style::default().fg(theme.muted))
    } else {
        Span::styled(select.query(), Style::default().fg(theme.text))
    };
    let input = Paragraph::new(Line::from(query)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .title(format!(" {} ", title)),
    );
    frame.render_widget(input, chunks[0]);
    frame.set_cursor_position((
        chunks[0].x + 1 + select.query().chars().count() as u16,
        chunks[0].y + 1,
    ));

    let filtered = select.filtered();
    let items: Vec<ListItem> = if filtered.is_empty() {
        vec![ListItem::new(Span::styled(
            "Ничего не найдено",
            Style::default().fg(theme.muted),
        ))]
    } else {
        filtered
            .iter()
            .enumerate()
            .map(|(index, option)| {
                let style = if select.highlighted() == Some(index) {
                    Style::default().fg(theme.surface).bg(theme.accent)
                } else {
                    Style::default().fg(theme.text)
                };
                ListItem::new(Span::styled(option.to_string(), style))
            })
            .collect()
    };
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border)),
    );
    frame.render_widget(list, chunks[1]);
}

/// Center a fixed-size box inside the area, clamped to it.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

/// Helper: a focusable labelled field rendered as one line.
fn field_line(label: &str, value: &str, focused: bool, placeholder: bool, theme: &Theme) -> Line<'static> {
    let marker = if focused { "› " } else { "  " };
    let label_style = if focused {
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.muted)
    };
    let value_style = if placeholder {
        Style::default().fg(theme.muted)
    } else {
        Style::default().fg(theme.text)
    };
    Line::from(vec![
        Span::styled(format!("{}{}: ", marker, label), label_style),
        Span::styled(value.to_string(), value_style),
    ])
}

/// Helper: a section heading with a focus marker.
fn section_line(title: &str, focused: bool, theme: &Theme) -> Line<'static> {
    let marker = if focused { "› " } else { "  " };
    let style = if focused {
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text).add_modifier(Modifier::BOLD)
    };
    Line::from(Span::styled(format!("{}{}", marker, title), style))
}

/// Helper: muted helper text under a field.
fn helper_line(text: &str, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(
        format!("    {}", text),
        Style::default().fg(theme.muted),
    ))
}

/// Helper: a label/value summary row.
fn summary_line(label: &str, value: &str, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {}: ", label), Style::default().fg(theme.muted)),
        Span::styled(value.to_string(), Style::default().fg(theme.text)),
    ])
}
