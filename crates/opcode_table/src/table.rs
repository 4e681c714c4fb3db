use std::collections::HashMap;

use data_sheet::Template;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::masks::BitMasks;

/// Number of slots in a dispatch table, one per 16-bit word.
pub const TABLE_SIZE: usize = 0x10000;

/// Index into [DispatchTable::handlers]. Up to [TABLE_SIZE] templates plus the default handler
/// can be named, one more than fits in a `u16`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct HandlerId(u32);

impl HandlerId {
    /// The handler for words no template claims.
    pub const DEFAULT: HandlerId = HandlerId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

struct Owner {
    handler: HandlerId,
    line: usize,
}

/// Fills a dispatch table one template at a time. Every slot can be claimed only once.
pub struct TableBuilder {
    handlers: Vec<String>,
    ids: HashMap<String, HandlerId>,
    owners: Vec<Owner>,
    slots: Vec<Option<u32>>,
}

impl TableBuilder {
    /// `default_handler` is installed in every slot left unclaimed by [TableBuilder::build].
    pub fn new(default_handler: &str) -> Self {
        Self {
            handlers: vec![default_handler.to_owned()],
            ids: HashMap::from([(default_handler.to_owned(), HandlerId::DEFAULT)]),
            owners: vec![],
            slots: vec![None; TABLE_SIZE],
        }
    }

    fn intern(&mut self, handler: &str) -> HandlerId {
        // The default handler may also be claimed by a template, so it is interned up front.
        if let Some(&id) = self.ids.get(handler) {
            return id;
        }

        // Every template claims at least one word, so there are at most TABLE_SIZE + 1 names.
        let id = HandlerId(self.handlers.len() as u32);
        self.handlers.push(handler.to_owned());
        self.ids.insert(handler.to_owned(), id);
        id
    }

    /// Claims every word the template matches. Fails without touching the table if any of those
    /// words was already claimed.
    pub fn insert(&mut self, template: &Template) -> Result<()> {
        let masks = BitMasks::from_template(template);

        debug!(
            "{:#06x} {:#06x} {} ({} words)",
            masks.fixed1,
            masks.variable,
            template.handler(),
            masks.extension().len()
        );

        if let Some(word) = masks
            .extension()
            .find(|&word| self.slots[word as usize].is_some())
        {
            let owner = self.slots[word as usize]
                .map(|o| &self.owners[o as usize])
                .map(|o| (self.handlers[o.handler.index()].clone(), o.line))
                .unwrap_or_default();

            return Err(Error::Overlap {
                word,
                first: owner.0,
                first_line: owner.1,
                second: template.handler().to_owned(),
                second_line: template.line(),
            });
        }

        let handler = self.intern(template.handler());
        let owner = self.owners.len() as u32;
        self.owners.push(Owner {
            handler,
            line: template.line(),
        });

        for word in masks.extension() {
            self.slots[word as usize] = Some(owner);
        }

        Ok(())
    }

    pub fn build(self) -> DispatchTable {
        let slots: Vec<HandlerId> = self
            .slots
            .iter()
            .map(|slot| match slot {
                Some(owner) => self.owners[*owner as usize].handler,
                None => HandlerId::DEFAULT,
            })
            .collect();

        let claimed = self.slots.iter().filter(|s| s.is_some()).count();

        DispatchTable {
            handlers: self.handlers,
            slots,
            claimed,
        }
    }
}

/// Maps every 16-bit word to the handler that executes it.
pub struct DispatchTable {
    handlers: Vec<String>,
    slots: Vec<HandlerId>,
    claimed: usize,
}

impl DispatchTable {
    /// Builds the table for all templates, in order. Stops at the first overlap.
    pub fn build(templates: &[Template], default_handler: &str) -> Result<Self> {
        let mut builder = TableBuilder::new(default_handler);
        for template in templates {
            builder.insert(template)?;
        }

        let table = builder.build();

        info!(
            "{} templates claim {} words, {} words go to {}",
            templates.len(),
            table.claimed(),
            table.unmatched(),
            table.default_handler()
        );

        Ok(table)
    }

    #[inline]
    pub fn get(&self, word: u16) -> &str {
        &self.handlers[self.slots[word as usize].index()]
    }

    #[inline]
    pub fn handler_id(&self, word: u16) -> HandlerId {
        self.slots[word as usize]
    }

    /// Handler names, indexed by [HandlerId]. The default handler comes first.
    pub fn handlers(&self) -> &[String] {
        &self.handlers
    }

    pub fn default_handler(&self) -> &str {
        &self.handlers[HandlerId::DEFAULT.index()]
    }

    /// Number of words claimed by a template.
    pub fn claimed(&self) -> usize {
        self.claimed
    }

    /// Number of words that fell through to the default handler.
    pub fn unmatched(&self) -> usize {
        TABLE_SIZE - self.claimed
    }

    /// Every word with its handler, in word order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &str)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .map(|(word, id)| (word as u16, self.handlers[id.index()].as_str()))
    }
}
