use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use strategy_chart::api::{ChartComposer, PlotScheme, classify};
use strategy_chart::core::{
    DataFeed, ObjectId, OhlcvBar, OwnerRef, PlotInfo, PlotLine, PlottableObject,
};
use strategy_chart::render::RecordingAdapter;

#[derive(Debug, Clone, Copy)]
struct ObjectShape {
    observer: bool,
    owner: u32,
    subplot: bool,
    plot_above: bool,
    visible: bool,
    stub: bool,
}

fn object_shape() -> impl Strategy<Value = ObjectShape> {
    (
        any::<bool>(),
        0u32..4,
        any::<bool>(),
        any::<bool>(),
        prop::bool::weighted(0.85),
        any::<bool>(),
    )
        .prop_map(|(observer, owner, subplot, plot_above, visible, stub)| ObjectShape {
            observer,
            owner,
            subplot,
            plot_above,
            visible,
            stub,
        })
}

fn build_strategy(
    data_count: u32,
    closes: &[f64],
    shapes: &[ObjectShape],
) -> strategy_chart::core::Strategy {
    let start = Utc
        .with_ymd_and_hms(2023, 6, 1, 0, 0, 0)
        .single()
        .expect("valid start");
    let mut strategy = strategy_chart::core::Strategy::new();
    for data in 1..=data_count {
        strategy = strategy.with_data(DataFeed::new(ObjectId::new(data), format!("D{data}")).with_bars(
            closes.iter().enumerate().map(|(i, &close)| {
                OhlcvBar::new(
                    start + Duration::days(i as i64),
                    close,
                    close + 1.0,
                    close - 1.0,
                    close,
                    50.0 + i as f64,
                )
            }),
        ));
    }

    for (index, shape) in shapes.iter().enumerate() {
        let id = ObjectId::new(100 + index as u32);
        let owner = ObjectId::new(shape.owner.min(data_count));
        let clock = if shape.stub {
            OwnerRef::Stub { target: owner }
        } else {
            OwnerRef::Direct(owner)
        };
        let info = PlotInfo::default()
            .with_plot(shape.visible)
            .with_plot_above(shape.plot_above);
        let info = PlotInfo {
            subplot: shape.subplot,
            ..info
        };
        let values: Vec<f64> = closes.iter().map(|close| close * 0.5).collect();
        let object = if shape.observer {
            PlottableObject::observer(id, format!("obs{index}"), clock)
        } else {
            PlottableObject::indicator(id, format!("ind{index}"), clock)
        }
        .with_plot_info(info)
        .with_line(PlotLine::new("value", values));
        strategy = if shape.observer {
            strategy.with_observer(object)
        } else {
            strategy.with_indicator(object)
        };
    }
    strategy
}

proptest! {
    #[test]
    fn every_visible_object_lands_in_exactly_one_group(
        data_count in 1u32..3,
        shapes in prop::collection::vec(object_shape(), 0..12),
    ) {
        let strategy = build_strategy(data_count, &[1.0, 2.0], &shapes);
        let groups = classify(&strategy);

        let visible = shapes.iter().filter(|shape| shape.visible).count();
        prop_assert_eq!(groups.len(), visible);
        for (index, shape) in shapes.iter().enumerate() {
            let placements = groups.placements_of(ObjectId::new(100 + index as u32));
            prop_assert_eq!(placements.len(), usize::from(shape.visible));
        }
    }

    #[test]
    fn composition_is_deterministic_and_fills_the_planned_rows(
        data_count in 1u32..3,
        closes in prop::collection::vec(1.0f64..500.0, 1..24),
        shapes in prop::collection::vec(object_shape(), 0..10),
        volume in any::<bool>(),
        overlay in any::<bool>(),
        rows_major in 1usize..8,
        rows_minor in 1usize..4,
    ) {
        let strategy = build_strategy(data_count, &closes, &shapes);
        let scheme = PlotScheme::default()
            .with_volume(volume, overlay)
            .with_row_spans(rows_major, rows_minor);
        let composer = ChartComposer::new(scheme).expect("valid scheme");

        let mut first_adapter = RecordingAdapter::default();
        let mut second_adapter = RecordingAdapter::default();
        let first = composer.plot(&strategy, &mut first_adapter).expect("first run");
        let second = composer.plot(&strategy, &mut second_adapter).expect("second run");

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first_adapter.axes(), second_adapter.axes());
        prop_assert_eq!(first.rows_used, first.total_rows);

        let mut next_row = 0;
        for panel in &first.panels {
            prop_assert_eq!(panel.rows.start, next_row);
            next_row = panel.rows.end();
        }
        prop_assert_eq!(next_row, first.total_rows);

        let labelled: Vec<_> = first_adapter
            .panels()
            .filter(|panel| panel.x_axis.as_ref().is_some_and(|x| x.tick_labels_visible))
            .map(|panel| panel.handle)
            .collect();
        prop_assert_eq!(labelled, first.last_panel.into_iter().collect::<Vec<_>>());
    }
}
