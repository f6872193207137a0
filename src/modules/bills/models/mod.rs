mod bill;

pub use bill::{
    Bill, BillDetails, BillListFilter, BillListQuery, BillRequest, BillSortColumn, BillStatus,
    BillView,
};
