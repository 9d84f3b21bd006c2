//! HTML rendering for the dashboard page.

use maud::{Markup, html};
use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    endpoints,
    html::{base, format_currency, truncate_graphemes},
    transaction::TransactionKind,
};

use super::page::{DashboardViewModel, TransactionRow};

/// The max number of graphemes to display in the transaction table rows before
/// truncating and displaying ellipses.
const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

const DATE_INPUT_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

fn format_date(date: OffsetDateTime) -> String {
    date.date()
        .format(DATE_INPUT_FORMAT)
        .unwrap_or_else(|_| date.date().to_string())
}

fn amount_class(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Income => "income",
        TransactionKind::Expense => "expense",
    }
}

/// Render the whole dashboard page.
pub(crate) fn dashboard_view(model: &DashboardViewModel) -> Markup {
    let content = html! {
        h1 { "Transactions" }

        (totals_cards(model))
        (filter_bar(model))
        (transaction_form(model))

        @if model.rows.is_empty() {
            p class="empty"
            {
                @if model.has_any_transactions {
                    "No transactions match the current filters."
                } @else {
                    "No transactions yet. Add your first one above."
                }
            }
        } @else {
            table
            {
                thead
                {
                    tr
                    {
                        th { "Date" }
                        th { "Type" }
                        th { "Category" }
                        th { "Description" }
                        th { "Amount" }
                        th { "" }
                    }
                }
                tbody
                {
                    @for row in &model.rows
                    {
                        (table_row(row))
                    }
                }
            }
        }
    };

    base("Dashboard", &content)
}

fn totals_cards(model: &DashboardViewModel) -> Markup {
    html! {
        div class="cards"
        {
            div class="card"
            {
                h2 { "Income" }
                p class="income" { (format_currency(model.totals.income)) }
            }
            div class="card"
            {
                h2 { "Expenses" }
                p class="expense" { (format_currency(model.totals.expense)) }
            }
            div class="card"
            {
                h2 { "Balance" }
                p { (format_currency(model.totals.balance())) }
            }
        }
    }
}

fn filter_bar(model: &DashboardViewModel) -> Markup {
    let filters = &model.filters;
    let kind = filters.kind.as_deref().unwrap_or("");

    html! {
        form class="filters" method="get" action=(endpoints::ROOT)
        {
            label
            {
                "Type"
                select name="type"
                {
                    option value="" selected[kind.is_empty()] { "All" }
                    option value="income" selected[kind == "income"] { "Income" }
                    option value="expense" selected[kind == "expense"] { "Expense" }
                }
            }
            label
            {
                "Category"
                input type="text" name="category" placeholder="Contains..."
                    value=(filters.category.as_deref().unwrap_or(""));
            }
            label
            {
                "From"
                input type="date" name="from" value=(filters.from.as_deref().unwrap_or(""));
            }
            label
            {
                "To"
                input type="date" name="to" value=(filters.to.as_deref().unwrap_or(""));
            }
            button type="submit" { "Filter" }
        }
    }
}

fn transaction_form(model: &DashboardViewModel) -> Markup {
    let editing = model.editing.as_ref();

    let (title, amount, category, date, description) = match editing {
        Some(transaction) => (
            "Edit transaction",
            transaction.amount.to_string(),
            transaction.category.clone(),
            format_date(transaction.date),
            transaction.description.clone(),
        ),
        None => (
            "New transaction",
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        ),
    };

    let form_kind = editing.map(|transaction| transaction.kind);

    html! {
        div class="form-box"
        {
            h2 { (title) }
            @match editing {
                Some(transaction) => {
                    form hx-put=(endpoints::format_endpoint(endpoints::TRANSACTION_FORM, transaction.id))
                    {
                        (transaction_form_fields(form_kind, &amount, &category, &date, &description))
                        button type="submit" { "Save" }
                        a class="button" href=(endpoints::ROOT) { "Cancel" }
                    }
                }
                None => {
                    form hx-post=(endpoints::CREATE_TRANSACTION_FORM)
                    {
                        (transaction_form_fields(form_kind, &amount, &category, &date, &description))
                        button type="submit" { "Add" }
                    }
                }
            }
        }
    }
}

fn transaction_form_fields(
    kind: Option<TransactionKind>,
    amount: &str,
    category: &str,
    date: &str,
    description: &str,
) -> Markup {
    html! {
        label
        {
            "Type"
            select name="type"
            {
                option value="income" selected[kind == Some(TransactionKind::Income)] { "Income" }
                option value="expense" selected[kind == Some(TransactionKind::Expense)] { "Expense" }
            }
        }
        label
        {
            "Amount"
            input type="number" name="amount" step="0.01" min="0" required value=(amount);
        }
        label
        {
            "Category"
            input type="text" name="category" required value=(category);
        }
        label
        {
            "Date"
            input type="date" name="date" value=(date);
        }
        label
        {
            "Description"
            input type="text" name="description" value=(description);
        }
    }
}

fn table_row(row: &TransactionRow) -> Markup {
    let transaction = &row.transaction;

    html! {
        tr
        {
            td { (format_date(transaction.date)) }
            td
            {
                span class={ "badge " (amount_class(transaction.kind)) }
                {
                    (transaction.kind)
                }
            }
            td { (transaction.category) }
            td { (truncate_graphemes(&transaction.description, MAX_DESCRIPTION_GRAPHEMES)) }
            td class=(amount_class(transaction.kind)) { (format_currency(transaction.amount)) }
            td
            {
                a class="button" href=(row.edit_url) { "Edit" }
                " "
                button class="delete"
                    hx-delete=(row.delete_url)
                    hx-target="closest tr"
                    hx-swap="outerHTML"
                    hx-confirm="Delete this transaction?"
                {
                    "Delete"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::{
        dashboard::page::{DashboardQuery, DashboardTotals, DashboardViewModel, TransactionRow},
        transaction::{Transaction, TransactionKind},
    };

    use super::dashboard_view;

    fn test_transaction() -> Transaction {
        Transaction {
            id: 1,
            kind: TransactionKind::Expense,
            amount: 1500.0,
            category: "Rent".to_owned(),
            date: datetime!(2025-03-01 0:00 UTC),
            description: "Monthly house rent payment".to_owned(),
        }
    }

    fn test_model() -> DashboardViewModel {
        let transaction = test_transaction();

        DashboardViewModel {
            rows: vec![TransactionRow {
                edit_url: "/?edit=1".to_owned(),
                delete_url: "/transactions/1".to_owned(),
                transaction,
            }],
            totals: DashboardTotals {
                income: 0.0,
                expense: 1500.0,
            },
            filters: DashboardQuery::default(),
            editing: None,
            has_any_transactions: true,
        }
    }

    #[test]
    fn renders_table_row_with_actions() {
        let markup = dashboard_view(&test_model()).into_string();

        assert!(markup.contains("Rent"));
        assert!(markup.contains("2025-03-01"));
        assert!(markup.contains("hx-delete=\"/transactions/1\""));
        assert!(markup.contains("href=\"/?edit=1\""));
    }

    #[test]
    fn renders_edit_form_when_editing() {
        let mut model = test_model();
        model.editing = Some(test_transaction());

        let markup = dashboard_view(&model).into_string();

        assert!(markup.contains("Edit transaction"));
        assert!(markup.contains("hx-put=\"/transactions/1\""));
        assert!(markup.contains("value=\"1500\""));
    }

    #[test]
    fn truncates_long_descriptions() {
        let mut model = test_model();
        model.rows[0].transaction.description =
            "An unreasonably wordy description of a grocery run".to_owned();

        let markup = dashboard_view(&model).into_string();

        assert!(markup.contains("…"));
        assert!(!markup.contains("grocery run"));
    }

    #[test]
    fn shows_empty_state_when_no_rows_match() {
        let mut model = test_model();
        model.rows.clear();

        let markup = dashboard_view(&model).into_string();

        assert!(markup.contains("No transactions match the current filters."));
    }
}
