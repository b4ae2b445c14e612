pub mod sample_documents;

pub mod test_helpers {
    use crate::events::Event;

    /// Builder for synthetic event streams, for exercising the parser without html5ever.
    pub struct EventScript {
        events: Vec<Event>,
    }

    impl Default for EventScript {
        fn default() -> Self {
            Self::new()
        }
    }

    impl EventScript {
        pub fn new() -> Self {
            Self {
                events: vec![Event::DocumentStart],
            }
        }

        pub fn open(mut self, tag: &str) -> Self {
            self.events.push(Event::start(tag));
            self
        }

        pub fn open_with(mut self, tag: &str, attrs: &[(&str, &str)]) -> Self {
            self.events.push(Event::start_with(tag, attrs));
            self
        }

        pub fn close(mut self, tag: &str) -> Self {
            self.events.push(Event::end(tag));
            self
        }

        pub fn text(mut self, text: &str) -> Self {
            self.events.push(Event::text(text));
            self
        }

        /// Opens `tag`, adds its text and closes it again.
        pub fn element(self, tag: &str, text: &str) -> Self {
            self.open(tag).text(text).close(tag)
        }

        pub fn build(mut self) -> Vec<Event> {
            self.events.push(Event::DocumentEnd);
            self.events
        }
    }
}
