use crate::facets::{Facet, FacetOptions};
use crate::selection::{SelectionState, SelectionSurface};

use crossbeam::channel::{unbounded, Receiver, Sender};
use log::warn;

#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    SelectionChanged(SelectionState),
    Cleared,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    FacetOptionsUpdated { facet: Facet, options: Vec<String> },
    SelectionReset,
}

#[derive(Debug)]
pub struct ChannelSelection {
    state: SelectionState,
    to_form: Sender<MapEvent>,
}

impl ChannelSelection {
    pub fn update(&mut self, state: SelectionState) {
        self.state = state;
    }

    fn publish(&self, event: MapEvent) {
        if self.to_form.send(event).is_err() {
            warn!("filter form is gone, dropping map event");
        }
    }
}

impl SelectionSurface for ChannelSelection {
    fn selected(&self, facet: Facet) -> Vec<String> {
        self.state
            .values(facet)
            .map(|v| v.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn set_options(&mut self, facet: Facet, options: &[String]) {
        self.publish(MapEvent::FacetOptionsUpdated {
            facet,
            options: options.to_vec(),
        });
    }

    fn reset(&mut self) {
        self.state.clear();
        self.publish(MapEvent::SelectionReset);
    }
}

#[derive(Debug)]
pub struct FormEndpoint {
    options: FacetOptions,
    state: SelectionState,
    to_map: Sender<FormEvent>,
    from_map: Receiver<MapEvent>,
}

impl FormEndpoint {
    pub fn select<I, S>(&mut self, facet: Facet, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.set(facet, values);
        self.publish(FormEvent::SelectionChanged(self.state.clone()));
    }

    pub fn clear(&mut self) {
        self.state.clear();
        self.publish(FormEvent::Cleared);
    }

    pub fn sync(&mut self) -> usize {
        let events: Vec<MapEvent> = self.from_map.try_iter().collect();
        let count = events.len();
        for event in events {
            match event {
                MapEvent::FacetOptionsUpdated { facet, options } => {
                    self.options.insert(facet, options);
                }
                MapEvent::SelectionReset => self.state.clear(),
            }
        }
        count
    }

    pub fn options(&self, facet: Facet) -> &[String] {
        self.options.get(&facet).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    fn publish(&self, event: FormEvent) {
        if self.to_map.send(event).is_err() {
            warn!("map is gone, dropping form event");
        }
    }
}

pub fn connect() -> (ChannelSelection, FormEndpoint, Receiver<FormEvent>) {
    let (to_form, from_map) = unbounded();
    let (to_map, form_events) = unbounded();

    let selection = ChannelSelection {
        state: SelectionState::new(),
        to_form,
    };
    let form = FormEndpoint {
        options: FacetOptions::new(),
        state: SelectionState::new(),
        to_map,
        from_map,
    };
    (selection, form, form_events)
}
