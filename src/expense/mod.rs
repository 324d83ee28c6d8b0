//! Everything for recording and browsing expenses: the core model and
//! queries, the add-expense page and endpoint, the filtered listing page,
//! and the delete endpoint.

mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod expenses_page;
mod query;

pub(crate) use core::{Expense, create_expense, create_expense_table, delete_expense};
pub(crate) use create_endpoint::create_expense_endpoint;
pub(crate) use create_page::get_add_expense_page;
pub(crate) use delete_endpoint::delete_expense_endpoint;
pub(crate) use expenses_page::get_expenses_page;
pub(crate) use query::{
    ExpenseFilter, ExpenseWithCategory, RECENT_EXPENSE_LIMIT, get_filtered_expenses,
    get_recent_expenses, sum_for_date, sum_from_date,
};

#[cfg(test)]
pub(crate) use core::get_expense;
